//! Breathing effect demo for the IN-WIN 805 chassis lighting.

use std::error::Error;
use std::thread;
use std::time::Duration;

use env_logger::Env;
use inwin_rgb::{Brightness, NativeBackend, Rgb, Session};
use log::warn;

/// Color of the breathing effect.
const COLOR: Rgb = Rgb::new(0x00, 0x00, 0xff);

/// Number of breaths before exiting.
const CYCLES: usize = 10;

/// Delay between brightness steps.
const STEP: Duration = Duration::from_millis(1);

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let mut session = Session::open(NativeBackend::new()?);
    session.set_color(COLOR);

    println!("Breathing {}", session.state());

    for _ in 0..CYCLES {
        for level in breath() {
            session.set_brightness(Brightness(level));
            write(&mut session)?;
            thread::sleep(STEP);
        }
    }

    println!("\x1b[32mSuccessfully applied changes.\x1b[0m");

    Ok(())
}

/// Brightness ramp of a single breath.
fn breath() -> impl Iterator<Item = u8> {
    (0..u8::max_value()).chain((0..=u8::max_value()).rev())
}

/// Write the current state, reopening the device once if the write fails.
fn write(session: &mut Session<NativeBackend>) -> Result<(), Box<dyn Error>> {
    if let Err(err) = session.update() {
        warn!("{}, reopening device", err);
        session.initialize();

        if let Err(err) = session.update() {
            return Err(format!("unable to write to device: {}", err).into());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breath_ramps_up_then_down() {
        let levels: Vec<u8> = breath().collect();

        assert_eq!(levels.len(), 255 + 256);
        assert_eq!(levels.first(), Some(&0));
        assert_eq!(levels[254], 254);
        assert_eq!(levels[255], 255);
        assert_eq!(levels.last(), Some(&0));
    }
}
