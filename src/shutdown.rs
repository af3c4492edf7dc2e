use std::{
    sync::{Condvar, Mutex},
    time::Instant,
};

// 停止要求を伝えるためのトークン
// producer は次の tick までここで待つので、停止要求があれば即座に起きられる
pub struct Shutdown {
    triggered: Mutex<bool>,
    cond: Condvar,
}

impl Shutdown {
    pub fn new() -> Self {
        Shutdown {
            triggered: Mutex::new(false),
            cond: Condvar::new(),
        }
    }

    pub fn trigger(&self) {
        let mut triggered = self.triggered.lock().unwrap();
        *triggered = true;
        self.cond.notify_all();
    }

    pub fn is_triggered(&self) -> bool {
        *self.triggered.lock().unwrap()
    }

    // deadline まで待機する。停止要求で起きた場合は true
    pub fn wait_until(&self, deadline: Instant) -> bool {
        let mut triggered = self.triggered.lock().unwrap();
        loop {
            if *triggered {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            // spurious wakeup もあるので、起きたら毎回残り時間を計算し直す
            triggered = self.cond.wait_timeout(triggered, deadline - now).unwrap().0;
        }
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ntest::timeout;
    use std::{sync::Arc, thread, time::Duration};

    #[test]
    fn test_wait_until_deadline() {
        let shutdown = Shutdown::new();
        let start = Instant::now();

        assert!(!shutdown.wait_until(start + Duration::from_millis(30)));
        assert!(start.elapsed() >= Duration::from_millis(30));
        assert!(!shutdown.is_triggered());
    }

    #[test]
    #[timeout(2000)]
    fn test_trigger_wakes_waiter() {
        let shutdown = Arc::new(Shutdown::new());
        let shutdown0 = shutdown.clone();

        let t = thread::spawn(move || {
            shutdown0.wait_until(Instant::now() + Duration::from_secs(60))
        });

        thread::sleep(Duration::from_millis(20));
        shutdown.trigger();

        assert!(t.join().unwrap());
        assert!(shutdown.is_triggered());
    }

    #[test]
    fn test_already_triggered_returns_immediately() {
        let shutdown = Shutdown::new();
        shutdown.trigger();
        assert!(shutdown.wait_until(Instant::now() + Duration::from_secs(60)));
    }
}
