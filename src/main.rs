use std::error::Error;
use std::io::{self, stdin, Write};

use crossterm::tty::IsTty;

use kombo::drill::Drill;
use kombo::error::DrillError;
use kombo::generator::{generate_sequence, DEFAULT_SEQUENCE_LEN};
use kombo::level::{LevelMap, MAX_LEVEL, MIN_LEVEL};
use kombo::runtime::{run_drill, CrosstermKeySource, DrillOutcome, RawModeGuard};
use kombo::sink::{NoopSink, ResultSink, SessionRecord, SupabaseSink};
use kombo::ui::{self, TerminalScreen};

fn main() -> Result<(), Box<dyn Error>> {
    let levels = LevelMap::standard();

    print!(
        "Please enter the level [{}-{}] you would like to play and press 'Enter': ",
        MIN_LEVEL, MAX_LEVEL
    );
    io::stdout().flush()?;

    let mut answer = String::new();
    stdin().read_line(&mut answer)?;

    let level = match levels.parse_selection(&answer) {
        Ok(level) => level,
        Err(DrillError::InvalidLevelSelection(_)) => {
            println!(
                "Please enter a valid level number between {} and {}.",
                MIN_LEVEL, MAX_LEVEL
            );
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    if !stdin().is_tty() {
        return Err(Box::new(io::Error::other(
            "stdin must be a tty to run a drill",
        )));
    }

    let charset = levels
        .charset(level)
        .ok_or(DrillError::InvalidConfiguration("level missing from map"))?;
    let sequence = generate_sequence(&mut rand::thread_rng(), charset, DEFAULT_SEQUENCE_LEN)?;
    let mut drill = Drill::new(sequence)?;

    let outcome = {
        let _raw = RawModeGuard::new()?;
        let mut keys = CrosstermKeySource;
        let mut screen = TerminalScreen;
        run_drill(&mut drill, &mut keys, &mut screen)?
    };

    match outcome {
        DrillOutcome::Aborted => {
            println!("Drill aborted; nothing recorded.");
        }
        DrillOutcome::Finished(result) => {
            ui::print_results(&result);
            let record = SessionRecord::new(level, &result);
            match SupabaseSink::from_env() {
                Some(sink) => sink.record_session(&record),
                None => NoopSink.record_session(&record),
            }
        }
    }

    Ok(())
}
