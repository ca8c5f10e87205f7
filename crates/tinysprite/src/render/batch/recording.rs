//! Headless backend that records every call, for batching tests.

use crate::paint::Color;

use super::{DrawBackend, TextureHandle, TextureId};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Event {
    Upload(usize),
    Bind(TextureId),
    Draw(u32),
    Clear(Color),
    EndFrame,
}

#[derive(Debug, Clone)]
pub(crate) struct FakeTexture {
    id: TextureId,
    width: u32,
    height: u32,
}

impl FakeTexture {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        Self { id: TextureId::next(), width, height }
    }
}

impl TextureHandle for FakeTexture {
    fn id(&self) -> TextureId {
        self.id
    }
    fn width(&self) -> u32 {
        self.width
    }
    fn height(&self) -> u32 {
        self.height
    }
}

#[derive(Debug, Default)]
pub(crate) struct RecordingBackend {
    pub(crate) events: Vec<Event>,
    /// Bytes of the most recent upload.
    pub(crate) uploaded: Vec<u8>,
}

impl RecordingBackend {
    pub(crate) fn draws(&self) -> Vec<u32> {
        self.events
            .iter()
            .filter_map(|e| if let Event::Draw(n) = e { Some(*n) } else { None })
            .collect()
    }

    pub(crate) fn binds(&self) -> Vec<TextureId> {
        self.events
            .iter()
            .filter_map(|e| if let Event::Bind(id) = e { Some(*id) } else { None })
            .collect()
    }

    /// Last upload reinterpreted as vertices.
    pub(crate) fn uploaded_vertices<V: bytemuck::Pod>(&self) -> Vec<V> {
        self.uploaded
            .chunks_exact(std::mem::size_of::<V>())
            .map(bytemuck::pod_read_unaligned)
            .collect()
    }
}

impl DrawBackend for RecordingBackend {
    type Texture = FakeTexture;

    fn upload_vertices(&mut self, bytes: &[u8]) {
        self.uploaded = bytes.to_vec();
        self.events.push(Event::Upload(bytes.len()));
    }

    fn bind_texture(&mut self, texture: &FakeTexture) {
        self.events.push(Event::Bind(texture.id()));
    }

    fn draw_indexed(&mut self, index_count: u32) {
        self.events.push(Event::Draw(index_count));
    }

    fn clear(&mut self, color: Color) {
        self.events.push(Event::Clear(color));
    }

    fn end_frame(&mut self) {
        self.events.push(Event::EndFrame);
    }
}
