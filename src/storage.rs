use std::sync::{Condvar, Mutex};

use tracing::{debug, info};

use crate::chip::Chip;

// remove がチップを取り出せると判断する条件
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Signaling {
    // available フラグ (bool) だけを見る
    // 2 個以上溜まっていても add 1 回につき remove は 1 回しか起きられない
    Flag,
    // バッファが空でなければ取り出せる
    #[default]
    Count,
}

struct State {
    chips: Vec<Chip>, // 後入れ先出し (LIFO)
    added: usize,     // これまでに add されたチップの総数
    available: bool,  // add で true, remove で false
    closed: bool,     // これ以上 add されない
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageSnapshot {
    pub queued: usize,
    pub added: usize,
    pub available: bool,
    pub closed: bool,
}

// ロック 1 つと条件変数 1 つで全状態を保護するモニタ
pub struct ChipStorage {
    state: Mutex<State>,
    cond: Condvar,
    signaling: Signaling,
}

impl ChipStorage {
    pub fn new(signaling: Signaling) -> Self {
        ChipStorage {
            state: Mutex::new(State {
                chips: Vec::new(),
                added: 0,
                available: false,
                closed: false,
            }),
            cond: Condvar::new(),
            signaling,
        }
    }

    pub fn signaling(&self) -> Signaling {
        self.signaling
    }

    // 容量制限は無いので producer がここでブロックすることはない
    pub fn add(&self, chip: Chip) -> usize {
        let mut state = self.state.lock().unwrap();
        state.available = true;
        state.chips.push(chip);
        state.added += 1;
        info!("Chip #{} added in storage!", state.added);
        self.cond.notify_one();
        state.added
    }

    // 取り出せるようになるまで待機し、最後に add されたチップを返す
    // close 済みで空なら None
    pub fn remove(&self) -> Option<Chip> {
        let mut state = self.state.lock().unwrap();
        while !self.is_ready(&state) {
            info!("Waiting...");
            state = self.cond.wait(state).unwrap();
        }
        state.available = false;
        // Flag の場合、close 後は取り残されたチップもここで回収される
        let chip = state.chips.pop();
        if chip.is_none() {
            debug!("storage closed and drained");
        }
        chip
    }

    fn is_ready(&self, state: &State) -> bool {
        if state.closed {
            return true;
        }
        match self.signaling {
            Signaling::Flag => state.available,
            Signaling::Count => !state.chips.is_empty(),
        }
    }

    // 待機中の consumer を全員起こす
    pub fn close(&self) {
        let mut state = self.state.lock().unwrap();
        state.closed = true;
        self.cond.notify_all();
    }

    pub fn added(&self) -> usize {
        self.state.lock().unwrap().added
    }

    pub fn snapshot(&self) -> StorageSnapshot {
        let state = self.state.lock().unwrap();
        StorageSnapshot {
            queued: state.chips.len(),
            added: state.added,
            available: state.available,
            closed: state.closed,
        }
    }
}
