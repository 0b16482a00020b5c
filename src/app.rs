use crate::config::Settings;
use crate::input::{collect_input_nonblocking, Action};
use crate::render::{frame_lines, Terminal};
use lifekernel::{DriverState, TickDriver};
use std::time::{Duration, Instant};
use tracing::info;

pub(crate) struct App {
    settings: Settings,
    driver: TickDriver,
    term: Terminal,
    should_quit: bool,
}

impl App {
    pub(crate) fn new(settings: Settings, driver: TickDriver) -> anyhow::Result<Self> {
        let term = Terminal::begin()?;
        Ok(Self {
            settings,
            driver,
            term,
            should_quit: false,
        })
    }

    pub(crate) fn run(&mut self) -> anyhow::Result<()> {
        let fps = self.settings.fps_cap.clamp(10, 240);
        let frame_dt = Duration::from_secs_f32(1.0 / fps as f32);
        let mut last_frame = Instant::now();

        while !self.should_quit {
            self.term.resize_if_needed()?;

            for action in collect_input_nonblocking(frame_dt)? {
                self.apply(action);
                if self.should_quit {
                    break;
                }
            }

            let now = Instant::now();
            let real_dt = now.saturating_duration_since(last_frame);
            last_frame = now;
            self.driver.advance(real_dt);

            self.render_frame()?;
            spin_sleep(frame_dt, Instant::now());
        }

        self.term.end()?;
        Ok(())
    }

    fn apply(&mut self, action: Action) {
        // Failed stage or rule requests are logged by the driver and leave
        // the current stage running.
        match action {
            Action::Quit => self.should_quit = true,
            Action::TogglePause => self.driver.toggle_pause(),
            Action::Step => {
                self.driver.step();
            }
            Action::NextStage => {
                let _ = self.driver.next_stage();
            }
            Action::PrevStage => {
                let _ = self.driver.prev_stage();
            }
            Action::Reload => {
                let _ = self.driver.reload();
            }
            Action::Rule(v) => {
                let _ = self.driver.set_variant(v);
            }
        }
    }

    fn render_frame(&mut self) -> anyhow::Result<()> {
        let (Some(grid), Some(stage)) = (self.driver.grid(), self.driver.stage()) else {
            return self.term.present(&[], "no stage loaded | q quit");
        };
        let lines = frame_lines(grid, stage.goal, stage.player_start);
        let status = format!(
            "{} | {} | tick {} | pop {} | {:?} {}ms | space pause . step n/p stage r reload 1-5 rule q quit",
            stage.name,
            self.driver.variant().unwrap_or_default(),
            self.driver.tick_count(),
            grid.population(),
            self.driver.state(),
            self.driver.interval().as_millis(),
        );
        self.term.present(&lines, &status)
    }
}

/// Runs `ticks` ticks without a terminal, then prints the final grid.
pub(crate) fn run_headless(driver: &mut TickDriver, ticks: u64) -> anyhow::Result<()> {
    if driver.state() == DriverState::Idle {
        anyhow::bail!("no stage loaded");
    }
    let mut births = 0;
    let mut deaths = 0;
    for _ in 0..ticks {
        if let Some(r) = driver.step() {
            births += r.births;
            deaths += r.deaths;
        }
    }

    let (Some(grid), Some(stage)) = (driver.grid(), driver.stage()) else {
        anyhow::bail!("no stage loaded");
    };
    info!(
        stage = %stage.name,
        rule = %driver.variant().unwrap_or_default(),
        ticks = driver.tick_count(),
        births,
        deaths,
        population = grid.population(),
        "headless run completed"
    );
    for line in frame_lines(grid, stage.goal, stage.player_start) {
        println!("{}", line.trim_end());
    }
    Ok(())
}

fn spin_sleep(target: Duration, now: Instant) {
    let end = now + target;
    loop {
        let t = Instant::now();
        if t >= end {
            break;
        }
        let left = end - t;
        if left > Duration::from_millis(2) {
            std::thread::sleep(Duration::from_millis(1));
        } else {
            std::hint::spin_loop();
        }
    }
}
