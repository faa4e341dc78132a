//! `requestAnimationFrame` 循环：每帧推进一次 [`Ticker`]

use std::cell::RefCell;
use std::rc::Rc;

use folio_runtime::Ticker;
use gloo::events::EventListener;
use gloo::render::{AnimationFrame, request_animation_frame};
use tracing::debug;
use web_sys::{Document, VisibilityState};

pub struct FrameLoop {
    ticker: RefCell<Ticker>,
    frame: RefCell<Option<AnimationFrame>>,
}

impl FrameLoop {
    pub fn new(ticker: Ticker) -> Rc<Self> {
        Rc::new(Self {
            ticker: RefCell::new(ticker),
            frame: RefCell::new(None),
        })
    }

    /// 开始循环，并在页面回到前台时丢弃积压的时间
    pub fn start(self: &Rc<Self>, document: &Document) {
        let this = Rc::clone(self);
        let doc = document.clone();
        EventListener::new(document, "visibilitychange", move |_| {
            if doc.visibility_state() == VisibilityState::Visible {
                debug!("页面回到前台，重置帧时间");
                this.ticker.borrow_mut().reset();
            }
        })
        .forget();

        self.schedule();
    }

    fn schedule(self: &Rc<Self>) {
        let this = Rc::clone(self);
        let handle = request_animation_frame(move |timestamp| {
            this.frame.borrow_mut().take();
            this.ticker.borrow_mut().tick(timestamp);
            this.schedule();
        });
        *self.frame.borrow_mut() = Some(handle);
    }
}
