use std::io;
use std::time::Duration;

use crossterm::cursor::Show;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture, Event as CEvent, EventStream};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
};
use futures::{Stream, StreamExt};
use tokio::time::Instant;
use tracing::{debug, info, warn};
use tui::backend::{Backend, CrosstermBackend};
use tui::Terminal;

use light_control::control::{Action, TrafficLight};
use light_control::edt::{Event, EDT};

use crate::error::AppError;
use crate::gpio::Board;
use crate::ui::{Command, View, Window, TITLE};

/// Switches the LEDs off when dropped, also when the loop bails out with an error
struct Cleanup<'a, 'b>(&'a TrafficLight<'b>);

impl<'a, 'b> Drop for Cleanup<'a, 'b> {
    fn drop(&mut self) {
        self.0.cleanup();
        info!("all LEDs off");
    }
}

/// Runs the window on the real terminal until the user exits
pub async fn run_terminal(board: &Board) -> Result<(), AppError> {
    let edt = EDT::<Action>::create();
    let (green, amber, red) = board.outputs();
    let light = TrafficLight::new(green, amber, red, &edt);
    light.start();
    let _cleanup = Cleanup(&light);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    let result = match execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        SetTitle(TITLE)
    ) {
        Ok(()) => match Terminal::new(CrosstermBackend::new(io::stdout())) {
            Ok(mut terminal) => run(&mut terminal, board, &light, &edt, EventStream::new()).await,
            Err(e) => Err(e.into()),
        },
        Err(e) => Err(e.into()),
    };

    if let Err(e) = restore_terminal() {
        warn!("cannot restore the terminal: {}", e);
    }
    result
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture, Show)
}

/// Feeds terminal events and due timeline messages to the traffic light
pub async fn run<B, S>(
    terminal: &mut Terminal<B>,
    board: &Board,
    light: &TrafficLight<'_>,
    edt: &EDT<Action>,
    mut events: S,
) -> Result<(), AppError>
where
    B: Backend,
    S: Stream<Item = io::Result<CEvent>> + Unpin,
{
    let mut window = Window::new();
    let mut last = Instant::now();

    loop {
        // hand the real elapsed time to the timeline, keeping the sub-millisecond rest
        let elapsed = last.elapsed().as_millis() as u64;
        last += Duration::from_millis(elapsed);
        edt.elapse(elapsed);
        while let Event::Execute { msg } = edt.poll() {
            light.process_message(msg);
        }

        let view = View {
            selected: light.selected(),
            cycling: light.is_cycling(),
            lit: board.lit(),
        };
        terminal.draw(|frame| window.draw(frame, view))?;

        let wait = edt.next_due().map(|ms| Duration::from_millis(ms as u64));
        let command = tokio::select! {
            event = events.next() => match event {
                Some(Ok(event)) => window.handle_event(event, light.is_cycling()),
                Some(Err(e)) => return Err(e.into()),
                None => Some(Command::Exit),
            },
            _ = deadline(wait) => None,
        };

        match command {
            Some(Command::Select(led)) => {
                if light.select(led) {
                    info!(led = led.label(), "selected");
                }
            }
            Some(Command::Cycle) => {
                if light.cycle() {
                    info!(restore = light.selected().label(), "cycle started");
                }
            }
            Some(Command::Exit) => {
                debug!("exit requested");
                return Ok(());
            }
            None => {}
        }
    }
}

async fn deadline(wait: Option<Duration>) {
    match wait {
        Some(wait) => tokio::time::sleep(wait).await,
        None => futures::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use futures::stream;
    use tui::backend::TestBackend;

    use light_control::control::Led;

    use super::*;

    fn press(c: char) -> io::Result<CEvent> {
        Ok(CEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)))
    }

    /// Key presses, each one after the given delay
    fn typed(keys: Vec<(u64, char)>) -> impl Stream<Item = io::Result<CEvent>> + Unpin {
        Box::pin(stream::iter(keys).then(|(delay, c)| async move {
            tokio::time::sleep(Duration::from_millis(delay)).await;
            press(c)
        }))
    }

    #[tokio::test(start_paused = true)]
    async fn selection_reaches_the_board() {
        let board = Board::simulated();
        let edt = EDT::<Action>::create();
        let (green, amber, red) = board.outputs();
        let light = TrafficLight::new(green, amber, red, &edt);
        light.start();
        let mut terminal = Terminal::new(TestBackend::new(30, 20)).unwrap();

        run(&mut terminal, &board, &light, &edt, typed(vec![(0, 'a')]))
            .await
            .unwrap();

        // the stream ended, which exits
        assert_eq!(light.current(), Led::Amber);
        assert_eq!(board.lit(), (false, true, false));
    }

    #[tokio::test(start_paused = true)]
    async fn cycle_runs_while_the_window_keeps_going() {
        let board = Board::simulated();
        let edt = EDT::<Action>::create();
        let (green, amber, red) = board.outputs();
        let light = TrafficLight::new(green, amber, red, &edt);
        light.start();
        let mut terminal = Terminal::new(TestBackend::new(30, 20)).unwrap();

        // red, cycle, a rejected green in the middle, then quit once it is over
        let keys = vec![(0, 'r'), (0, 'c'), (2500, 'g'), (3000, 'q')];
        run(&mut terminal, &board, &light, &edt, typed(keys))
            .await
            .unwrap();

        assert!(!light.is_cycling());
        assert_eq!(light.current(), Led::Red);
        assert_eq!(board.lit(), (false, false, true));
    }

    #[tokio::test(start_paused = true)]
    async fn quitting_mid_cycle_leaves_the_cycle_for_cleanup() {
        let board = Board::simulated();
        let edt = EDT::<Action>::create();
        let (green, amber, red) = board.outputs();
        let light = TrafficLight::new(green, amber, red, &edt);
        light.start();
        let mut terminal = Terminal::new(TestBackend::new(30, 20)).unwrap();

        {
            let _cleanup = Cleanup(&light);
            run(&mut terminal, &board, &light, &edt, typed(vec![(0, 'c'), (1000, 'q')]))
                .await
                .unwrap();
            assert!(light.is_cycling());
            assert_eq!(board.lit(), (true, false, false));
        }

        assert!(!light.is_cycling());
        assert_eq!(board.lit(), (false, false, false));
        assert_eq!(edt.queue_len(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn terminal_failure_mid_cycle_still_switches_everything_off() {
        let board = Board::simulated();
        let edt = EDT::<Action>::create();
        let (green, amber, red) = board.outputs();
        let light = TrafficLight::new(green, amber, red, &edt);
        light.start();
        let mut terminal = Terminal::new(TestBackend::new(30, 20)).unwrap();

        // the terminal goes away one second into the cycle
        let events = Box::pin(typed(vec![(0, 'c')]).chain(stream::once(async {
            tokio::time::sleep(Duration::from_millis(1000)).await;
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "terminal gone"))
        })));

        let result = {
            let _cleanup = Cleanup(&light);
            let result = run(&mut terminal, &board, &light, &edt, events).await;
            assert!(light.is_cycling());
            result
        };

        assert!(matches!(result, Err(AppError::Io(_))));
        assert_eq!(board.lit(), (false, false, false));
        assert_eq!(edt.queue_len(), 0);
    }
}
