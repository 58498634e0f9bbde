use crate::tui::TuiMsg;
use crossterm::event;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time;

const POLL_INTERVAL: Duration = Duration::from_millis(100);
const TICK_INTERVAL: Duration = Duration::from_millis(80);

/// Terminal input and spinner ticks, both feeding the UI channel. Set the
/// returned flag to stop them.
pub fn spawn_tui_feeders(tx: mpsc::Sender<TuiMsg>) -> Arc<AtomicBool> {
    let stop = Arc::new(AtomicBool::new(false));

    // One blocking thread for the whole session. Polling with a timeout lets
    // it notice `stop` without waiting for another key press.
    let tx_in = tx.clone();
    let stop_in = stop.clone();
    tokio::task::spawn_blocking(move || {
        while !stop_in.load(Ordering::Relaxed) {
            let msg = match event::poll(POLL_INTERVAL) {
                Ok(false) => continue,
                Ok(true) => match event::read() {
                    Ok(ev) => TuiMsg::Input(ev),
                    Err(e) => TuiMsg::InputError(e.to_string()),
                },
                Err(e) => TuiMsg::InputError(e.to_string()),
            };
            if tx_in.blocking_send(msg).is_err() {
                break;
            }
        }
    });

    let stop_tick = stop.clone();
    tokio::spawn(async move {
        let mut interval = time::interval(TICK_INTERVAL);
        while !stop_tick.load(Ordering::Relaxed) {
            interval.tick().await;
            if tx.is_closed() {
                break;
            }
            let _ = tx.try_send(TuiMsg::Tick);
        }
    });

    stop
}
