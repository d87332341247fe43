use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use pixels::{Pixels, SurfaceTexture};
use rand::rngs::ThreadRng;
use stopsig_experiment::state::{ExperimentEvent, ExperimentStateMachine};
use stopsig_experiment::{ExperimentConfig, instructions, keymap};
use stopsig_render::{Scene, SkiaRenderer};
use stopsig_timing::{HighPrecisionTimer, Timer};
use tracing::{info, warn};
use winit::{
    application::ApplicationHandler,
    event::{KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{Key, KeyCode, NamedKey, PhysicalKey},
    window::{Fullscreen, Window, WindowId},
};

use crate::intake::Intake;
use crate::storage;

pub struct App {
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,
    renderer: Option<SkiaRenderer>,
    experiment: ExperimentStateMachine<HighPrecisionTimer, ThreadRng>,
    results_dir: PathBuf,
    saved: bool,
    should_exit: bool,
}

impl App {
    pub fn new(intake: Intake) -> Result<Self> {
        let config = ExperimentConfig::default();
        let timer = HighPrecisionTimer::new();
        let rng = rand::rng();
        let experiment = ExperimentStateMachine::new(
            config,
            timer,
            rng,
            intake.participant_id,
            intake.demographics,
        );

        Ok(Self {
            window: None,
            pixels: None,
            renderer: None,
            experiment,
            results_dir: PathBuf::from("results"),
            saved: false,
            should_exit: false,
        })
    }

    pub fn run(mut self) -> Result<()> {
        let event_loop = EventLoop::new()?;
        info!(
            platform = std::env::consts::OS,
            arch = std::env::consts::ARCH,
            "starting stop-signal task"
        );

        event_loop.run_app(&mut self).map_err(Into::into)
    }

    fn create_window_and_surface(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let primary_monitor = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next())
            .ok_or_else(|| anyhow::anyhow!("No monitor available"))?;

        let window_attributes = Window::default_attributes()
            .with_title("Stop-Signal Task")
            .with_fullscreen(Some(Fullscreen::Borderless(Some(primary_monitor))))
            .with_resizable(false);

        let window = Arc::new(event_loop.create_window(window_attributes)?);
        let physical_size = window.inner_size();

        let surface_texture =
            SurfaceTexture::new(physical_size.width, physical_size.height, window.clone());
        self.pixels = Some(Pixels::new(
            physical_size.width,
            physical_size.height,
            surface_texture,
        )?);
        self.renderer = Some(SkiaRenderer::new(physical_size.width, physical_size.height)?);

        window.set_cursor_visible(false);
        window.request_redraw();
        self.window = Some(window);

        Ok(())
    }

    /// One loop iteration: poll the state machine, feed its events back,
    /// draw, and finalize once the session is over.
    fn frame(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        for event in self.experiment.update() {
            self.experiment.handle_event(event);
        }

        self.render()?;

        if self.experiment.is_ended() {
            self.finalize_and_exit(event_loop);
        } else if self.experiment.phase().is_terminal() {
            // Completion screen stays up briefly, then the record is written.
            let hold = Duration::from_millis(self.experiment.config.completion_hold_ms);
            self.experiment.timer.sleep(hold);
            self.finalize_and_exit(event_loop);
        }
        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        let (Some(pixels), Some(renderer)) = (self.pixels.as_mut(), self.renderer.as_mut()) else {
            return Ok(());
        };

        let instruction = self.experiment.instruction_text();
        let display = self.experiment.stimulus_display();
        let scene = Scene {
            instruction: instruction.as_deref(),
            stimulus_glyph: display.map(|(stimulus, _)| stimulus.glyph()),
            stop_marker: display.is_some_and(|(_, marker)| marker),
            feedback: self.experiment.feedback(),
            attention_prompt: self
                .experiment
                .attention_prompt_active()
                .then_some(instructions::ATTENTION_PROMPT),
            progress: self.experiment.trial_progress(),
            key_reminder: self.experiment.key_reminder(),
        };

        renderer.render_frame(&scene, pixels.frame_mut())?;
        pixels.render()?;
        Ok(())
    }

    fn handle_input(&mut self, event: &KeyEvent) {
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };

        let phase = self.experiment.phase();
        if phase.is_instruction() {
            match code {
                KeyCode::Space => {
                    self.experiment.handle_event(ExperimentEvent::SpacePressed);
                }
                KeyCode::Escape => {
                    self.experiment.handle_event(ExperimentEvent::EndSession);
                }
                _ => {}
            }
        } else if let Some(task) = phase.task() {
            if code == KeyCode::Tab {
                self.experiment.handle_event(ExperimentEvent::SkipBlock);
                return;
            }
            let logical = match &event.logical_key {
                Key::Character(s) => s.chars().next(),
                Key::Named(NamedKey::Space) => Some(' '),
                _ => None,
            };
            let code_name = format!("{code:?}").to_lowercase();
            if let Some(key) = keymap::resolve(task, logical, &code_name) {
                self.experiment
                    .handle_event(ExperimentEvent::ResponseReceived(key));
            }
        }
    }

    fn handle_resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if let Some(pixels) = &mut self.pixels {
            if let Err(error) = pixels.resize_surface(new_size.width, new_size.height) {
                warn!(%error, "failed to resize surface");
            }
            if let Err(error) = pixels.resize_buffer(new_size.width, new_size.height) {
                warn!(%error, "failed to resize buffer");
            }
        }
        if let Some(renderer) = &mut self.renderer {
            if let Err(error) = renderer.resize(new_size.width, new_size.height) {
                warn!(%error, "failed to resize canvas");
            }
        }
    }

    /// Best-effort save of everything recorded so far, then exit. Also the
    /// landing point when a frame errors out mid-block.
    fn finalize_and_exit(&mut self, event_loop: &ActiveEventLoop) {
        if !self.saved {
            self.saved = true;
            let record = self.experiment.snapshot_record();
            match storage::save_record(&record, &self.results_dir) {
                Ok(path) => info!(
                    path = %path.display(),
                    trials = record.results.len(),
                    "results saved"
                ),
                Err(error) => warn!(%error, "failed to save results"),
            }
            println!("\nExperiment ended. Thank you for your participation.");
        }

        if let Some(window) = &self.window {
            window.set_cursor_visible(true);
        }
        self.should_exit = true;
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(error) = self.create_window_and_surface(event_loop) {
                warn!(%error, "failed to create window and surface");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.finalize_and_exit(event_loop),
            WindowEvent::RedrawRequested => {
                if let Err(error) = self.frame(event_loop) {
                    // Anything unexpected mid-block still gets a save.
                    warn!(%error, "frame failed; saving and ending session");
                    self.finalize_and_exit(event_loop);
                    return;
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            WindowEvent::KeyboardInput { event, .. } if event.state.is_pressed() && !event.repeat => {
                self.handle_input(&event);
            }
            WindowEvent::Resized(size) => self.handle_resize(size),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.should_exit {
            event_loop.exit();
        }
    }
}
