use std::time::Duration;

use anyhow::Result;
use rand::rngs::StdRng;
use winit::event::{ElementState, MouseButton, WindowEvent};

use tinysprite::coords::Viewport;
use tinysprite::core::{App, AppControl, FrameCtx};
use tinysprite::render::{
    BatchConfig, BatchStats, InstanceRenderer, InstanceTransform, RenderCtx, SpriteRenderer,
    Texture,
};
use tinysprite::time::RateMeter;

use crate::kittens::Herd;
use crate::sheet;
use crate::Mode;

const BACKGROUND: f32 = 0.227;

enum Renderer {
    Sprite(SpriteRenderer),
    Instanced(InstanceRenderer),
}

/// GPU objects, created on the first frame once a device exists.
struct Gfx {
    renderer: Renderer,
    sheet: Texture,
}

impl Gfx {
    fn new(ctx: &RenderCtx<'_>, mode: Mode, config: &BatchConfig) -> Result<Self> {
        let sheet = ctx.texture_rgba8(sheet::WIDTH, sheet::HEIGHT, &sheet::generate())?;
        let renderer = match mode {
            Mode::Sprite => {
                let mut r = SpriteRenderer::new(ctx, config)?;
                r.set_clear_color(BACKGROUND, BACKGROUND, BACKGROUND);
                Renderer::Sprite(r)
            }
            Mode::Instanced => {
                let mut r = InstanceRenderer::new(ctx, config)?;
                r.set_clear_color(BACKGROUND, BACKGROUND, BACKGROUND);
                Renderer::Instanced(r)
            }
        };
        log::info!("{mode:?} renderer ready");
        Ok(Self { renderer, sheet })
    }

    fn draw(&mut self, target: &wgpu::TextureView, viewport: Viewport, herd: &Herd) -> BatchStats {
        let half = sheet::CELL as f32 / 2.0;
        let size = sheet::CELL as f32;

        match &mut self.renderer {
            Renderer::Sprite(r) => {
                r.begin_frame(target, viewport);
                r.clear();
                for k in herd.iter() {
                    r.push();
                    r.translate(k.x, k.y);
                    r.rotate(k.rotation);
                    r.img(&self.sheet, -half, 0.0, size, size, sheet::frame_uv(k.frame));
                    r.pop();
                }
                r.end_frame();
                r.take_stats()
            }
            Renderer::Instanced(r) => {
                r.begin_frame(target, viewport);
                r.clear();
                for k in herd.iter() {
                    let t = InstanceTransform::new(k.rotation, k.x, k.y, 1.0, 1.0);
                    r.img(&self.sheet, -half, 0.0, size, size, t, sheet::frame_uv(k.frame));
                }
                r.end_frame();
                r.take_stats()
            }
        }
    }
}

pub struct BenchApp {
    mode: Mode,
    batch: BatchConfig,
    add_per_frame: usize,

    gfx: Option<Gfx>,
    herd: Herd,
    rng: StdRng,

    adding: bool,
    frame: usize,

    meter: RateMeter,
    draws: u32,
    frames: u32,
}

impl BenchApp {
    pub fn new(mode: Mode, batch: BatchConfig, start: usize, add: usize, mut rng: StdRng) -> Self {
        let mut herd = Herd::default();
        herd.spawn(start, 0, false, &mut rng);
        Self {
            mode,
            batch,
            add_per_frame: add,
            gfx: None,
            herd,
            rng,
            adding: false,
            frame: 0,
            meter: RateMeter::new(Duration::from_secs(1)),
            draws: 0,
            frames: 0,
        }
    }
}

impl App for BenchApp {
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        if let WindowEvent::MouseInput { state, button: MouseButton::Left, .. } = event {
            self.adding = *state == ElementState::Pressed;
            if self.adding {
                self.frame = (self.frame + 1) % sheet::FRAMES;
            }
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let viewport = ctx.window.viewport();

        if self.adding {
            let added = self.herd.spawn(self.add_per_frame, self.frame, true, &mut self.rng);
            if added > 0 {
                log::debug!("{} kittens", self.herd.len());
            }
        }
        self.herd.step(viewport, &mut self.rng);

        let Self { mode, batch, gfx, herd, .. } = &mut *self;
        let mut stats = BatchStats::default();
        let control = ctx.render(|rctx, target| {
            if gfx.is_none() {
                *gfx = Some(Gfx::new(rctx, *mode, batch)?);
            }
            if let Some(gfx) = gfx {
                stats = gfx.draw(target, rctx.viewport, herd);
            }
            Ok(())
        });

        self.draws += stats.draw_calls;
        self.frames += 1;
        if let Some(fps) = self.meter.record(ctx.time.now) {
            log::info!(
                "{} kittens, {:.1} draws/frame, {fps:.1} fps",
                self.herd.len(),
                self.draws as f32 / self.frames.max(1) as f32
            );
            self.draws = 0;
            self.frames = 0;
        }

        control
    }
}
