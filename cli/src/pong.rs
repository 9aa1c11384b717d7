use anyhow::Result;
use arcade_core::pong::*;
use arcade_core::runner::*;
use clap::Args;
use std::io::{self, Write};
use std::time::Duration;

#[derive(Args, Debug)]
pub struct PongArgs {
    /// Longest match to simulate, in seconds
    #[arg(long, default_value_t = 600)]
    seconds: u64,

    /// Frames per second handed to the renderer
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Run against the wall clock instead of as fast as possible
    #[arg(long)]
    realtime: bool,

    /// Print JSON snapshots instead of drawing the court
    #[arg(long)]
    json: bool,

    /// How far above the ball the autopilot holds the top of its paddle
    #[arg(long, default_value_t = 80.0)]
    aim: f32,
}

const VIEW_COLS: usize = 40;
const VIEW_ROWS: usize = 12;

/// Stands in for the pointer, holding the paddle at a fixed height relative to the ball.
struct Autopilot {
    aim: f32,
}

impl InputSource for Autopilot {
    fn sample(&mut self, view: &PongSnapshot) -> Option<f32> {
        view.ball
            .moving_toward(Side::Player)
            .then(|| view.ball.y - self.aim)
    }
}

/// Draws the court every `every` quanta and reports points as they happen.
struct TerminalRenderer<W> {
    out: W,
    every: u64,
    quanta: u64,
    json: bool,
    error: Option<io::Error>,
}

impl<W: Write> TerminalRenderer<W> {
    fn new(out: W, every: u64, json: bool) -> Self {
        Self {
            out,
            every: every.max(1),
            quanta: 0,
            json,
            error: None,
        }
    }

    fn draw_court(&mut self, snapshot: &PongSnapshot) -> io::Result<()> {
        let cell = |value: f32, extent: f32, cells: usize| {
            ((value / extent * cells as f32) as usize).min(cells - 1)
        };
        let mut grid = [[' '; VIEW_COLS]; VIEW_ROWS];
        for line in &mut grid {
            line[VIEW_COLS / 2] = ':';
        }
        for (paddle, col) in [
            (snapshot.player_paddle, 0),
            (snapshot.computer_paddle, VIEW_COLS - 1),
        ] {
            let top = cell(paddle.y, COURT_HEIGHT, VIEW_ROWS);
            let bottom = cell(paddle.bottom(), COURT_HEIGHT, VIEW_ROWS);
            for row in top..=bottom {
                grid[row][col] = '|';
            }
        }
        let ball = snapshot.ball;
        let col = cell(ball.x.max(0.0), COURT_WIDTH, VIEW_COLS);
        let row = cell(ball.y.max(0.0), COURT_HEIGHT, VIEW_ROWS);
        grid[row][col] = 'o';

        writeln!(
            self.out,
            "+{}+ {:>2} - {:<2}",
            "-".repeat(VIEW_COLS),
            snapshot.score.player,
            snapshot.score.computer
        )?;
        for line in grid {
            writeln!(self.out, "|{}|", line.iter().collect::<String>())?;
        }
        writeln!(self.out, "+{}+", "-".repeat(VIEW_COLS))
    }

    fn write_frame(&mut self, snapshot: &PongSnapshot, events: &[PongEvent]) -> io::Result<()> {
        self.quanta += 1;
        let due = self.quanta % self.every == 0;

        if self.json {
            if due || !events.is_empty() {
                serde_json::to_writer(&mut self.out, snapshot)?;
                writeln!(self.out)?;
            }
            return Ok(());
        }

        for event in events {
            match event {
                PongEvent::Scored(side) => writeln!(
                    self.out,
                    "{side} scores, {} - {}",
                    snapshot.score.player, snapshot.score.computer
                )?,
                PongEvent::GameOver(side) => writeln!(self.out, "game over, {side} wins")?,
                PongEvent::WallBounce | PongEvent::PaddleHit(_) => {}
            }
        }
        if due {
            self.draw_court(snapshot)?;
        }
        Ok(())
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, snapshot: &PongSnapshot, events: &[PongEvent]) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.write_frame(snapshot, events) {
            log::warn!("Rendering failed, output stopped: {}", err);
            self.error = Some(err);
        }
    }
}

pub fn run(args: &PongArgs, seed: u64) -> Result<()> {
    let fps = args.fps.max(1);
    let mut pong = Pong::new(seed);
    pong.start();

    let renderer = TerminalRenderer::new(io::stdout().lock(), fps.into(), args.json);
    let mut frame_loop = FrameLoop::new(pong, Autopilot { aim: args.aim }, renderer);

    let control = if args.realtime {
        let stop = frame_loop.stop_handle();
        let seconds = args.seconds;
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_secs(seconds));
            stop.stop();
        });
        frame_loop.run_realtime(fps)
    } else {
        frame_loop.run_for(args.seconds.saturating_mul(fps.into()), 1.0 / fps as f32)
    };
    log::debug!("Loop ended: {:?}", control);

    let (pong, _, renderer) = frame_loop.into_parts();
    let TerminalRenderer { mut out, error, .. } = renderer;
    if let Some(err) = error {
        return Err(anyhow::Error::new(err).context("writing frames"));
    }

    let score = pong.score();
    match pong.winner() {
        Some(side) => writeln!(out, "{side} won {} - {}", score.player, score.computer)?,
        None => writeln!(
            out,
            "no winner after {} frames, {} - {}",
            pong.frame(),
            score.player,
            score.computer
        )?,
    }
    writeln!(out, "computer difficulty ended at {:.1}", pong.difficulty())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> PongSnapshot {
        Pong::new(1).snapshot()
    }

    #[test]
    fn autopilot_only_moves_for_incoming_ball() {
        let mut autopilot = Autopilot { aim: 80.0 };
        let mut view = snapshot();

        assert_eq!(autopilot.sample(&view), None);
        view.ball.vx = -7.0;
        assert_eq!(autopilot.sample(&view), Some(view.ball.y - 80.0));
    }

    #[test]
    fn draws_court_with_score() {
        let mut renderer = TerminalRenderer::new(Vec::new(), 1, false);
        let mut view = snapshot();
        view.frame = 1;
        view.score.player = 3;

        renderer.render(&view, &[PongEvent::Scored(Side::Player)]);

        let text = String::from_utf8(renderer.out).unwrap();
        assert!(text.starts_with("player scores, 3 - 0\n"));
        assert!(text.contains(" 3 - 0 "));
        assert!(text.contains('o'));
        assert_eq!(text.lines().count(), 1 + VIEW_ROWS + 2);
    }

    #[test]
    fn json_lines_parse_back() {
        let mut renderer = TerminalRenderer::new(Vec::new(), 2, true);
        let mut view = snapshot();
        for frame in 1..=4 {
            view.frame = frame;
            renderer.render(&view, &[]);
        }

        let text = String::from_utf8(renderer.out).unwrap();
        let frames: Vec<u64> = text
            .lines()
            .map(|line| serde_json::from_str::<PongSnapshot>(line).unwrap().frame)
            .collect();
        assert_eq!(frames, vec![2, 4]);
    }
}
