use anyhow::{Context, Result, anyhow, bail};
use arcade_core::*;
use clap::Args;
use std::io::{BufRead, Write};
use std::str::FromStr;

#[derive(Args, Debug)]
pub struct MinesweeperArgs {
    /// Board preset: easy, medium or hard
    #[arg(short, long, default_value_t = Difficulty::Easy)]
    difficulty: Difficulty,
}

const HELP: &str = "\
commands:
  r ROW COL   reveal a cell
  f ROW COL   place or remove a flag
  c ROW COL   reveal around a satisfied number
  n           new game
  d TIER      new game on easy, medium or hard
  q           quit";

#[derive(Copy, Clone, Debug, PartialEq)]
enum Action {
    Reveal(Coord2),
    Flag(Coord2),
    Chord(Coord2),
    NewGame,
    SetDifficulty(Difficulty),
    Help,
    Quit,
}

fn parse_coords<'a>(mut words: impl Iterator<Item = &'a str>) -> Result<Coord2> {
    let mut next = |name: &str| -> Result<Coord> {
        let word = words.next().ok_or_else(|| anyhow!("missing {name}"))?;
        word.parse().with_context(|| format!("bad {name} {word:?}"))
    };
    let row = next("row")?;
    let col = next("column")?;
    Ok((row, col))
}

impl FromStr for Action {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            bail!("empty command");
        };
        Ok(match command {
            "r" | "reveal" => Self::Reveal(parse_coords(words)?),
            "f" | "flag" => Self::Flag(parse_coords(words)?),
            "c" | "chord" => Self::Chord(parse_coords(words)?),
            "n" | "new" => Self::NewGame,
            "d" | "difficulty" => {
                let tier = words.next().ok_or_else(|| anyhow!("missing tier"))?;
                Self::SetDifficulty(tier.parse()?)
            }
            "h" | "help" | "?" => Self::Help,
            "q" | "quit" => Self::Quit,
            other => bail!("unknown command {other:?}"),
        })
    }
}

fn draw(out: &mut impl Write, engine: &Minesweeper) -> Result<()> {
    let snapshot = engine.snapshot();
    let (_, cols) = snapshot.size;

    write!(out, "    ")?;
    for col in 0..cols {
        write!(out, "{}", col % 10)?;
    }
    writeln!(out)?;
    for (row, line) in snapshot.to_text().lines().enumerate() {
        writeln!(out, "{row:>3} {line}")?;
    }

    let status = match snapshot.status {
        GameStatus::Playing => "playing",
        GameStatus::Won => "you won!",
        GameStatus::Lost => "boom, game over",
    };
    writeln!(out, "flags left: {}  {}", snapshot.flags_remaining, status)?;
    Ok(())
}

/// Runs the command loop until `q` or end of input.
fn play(
    engine: &mut Minesweeper,
    input: impl BufRead,
    out: &mut impl Write,
    mut next_seed: impl FnMut() -> u64,
) -> Result<()> {
    draw(out, engine)?;
    for line in input.lines() {
        let line = line.context("reading command")?;
        if line.trim().is_empty() {
            continue;
        }

        let action = match line.parse::<Action>() {
            Ok(action) => action,
            Err(err) => {
                writeln!(out, "{err:#}, try `help`")?;
                continue;
            }
        };
        log::trace!("{:?}", action);

        let redraw = match action {
            Action::Reveal(coords) => engine.reveal(coords).map(RevealOutcome::has_update),
            Action::Flag(coords) => engine.toggle_flag(coords).map(MarkOutcome::has_update),
            Action::Chord(coords) => engine.chord_reveal(coords).map(RevealOutcome::has_update),
            Action::NewGame => {
                engine.reset(next_seed());
                Ok(true)
            }
            Action::SetDifficulty(tier) => {
                engine.set_difficulty(tier, next_seed());
                Ok(true)
            }
            Action::Help => {
                writeln!(out, "{HELP}")?;
                Ok(false)
            }
            Action::Quit => break,
        };

        match redraw {
            Ok(true) => draw(out, engine)?,
            Ok(false) => {}
            Err(err) => {
                let (rows, cols) = engine.size();
                writeln!(out, "{err}, the board is {rows}x{cols}")?;
            }
        }
    }
    Ok(())
}

pub fn run(args: &MinesweeperArgs, seed: u64) -> Result<()> {
    let mut engine = Minesweeper::new(args.difficulty, seed);
    let mut games = 0u64;
    let next_seed = move || {
        games += 1;
        seed.wrapping_add(games)
    };

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{HELP}")?;
    play(&mut engine, stdin.lock(), &mut stdout, next_seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(engine: &mut Minesweeper, commands: &str) -> String {
        let mut out = Vec::new();
        play(engine, commands.as_bytes(), &mut out, || 1).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn parses_actions() {
        assert_eq!("r 1 2".parse::<Action>().unwrap(), Action::Reveal((1, 2)));
        assert_eq!("flag 0 8".parse::<Action>().unwrap(), Action::Flag((0, 8)));
        assert_eq!(
            "d hard".parse::<Action>().unwrap(),
            Action::SetDifficulty(Difficulty::Hard)
        );
        assert!("r 1".parse::<Action>().is_err());
        assert!("r -1 2".parse::<Action>().is_err());
        assert!("x".parse::<Action>().is_err());
    }

    #[test]
    fn plays_to_a_win() {
        let layout = MineLayout::from_mine_coords((2, 2), &[(0, 0)]).unwrap();
        let mut engine = Minesweeper::from_layout(layout);

        let out = session(&mut engine, "f 0 0\nr 1 1\nr 0 1\nr 1 0\nr 5 5\nq\nr 0 0\n");

        assert_eq!(engine.status(), GameStatus::Won);
        assert!(out.contains("you won!"));
        assert!(out.contains("Invalid coordinates, the board is 2x2"));
    }

    #[test]
    fn bad_input_keeps_going() {
        let mut engine = Minesweeper::new(Difficulty::Easy, 3);

        let out = session(&mut engine, "bogus\n\nd medium\n");

        assert!(out.contains("unknown command"));
        assert_eq!(engine.size(), (16, 16));
    }
}
