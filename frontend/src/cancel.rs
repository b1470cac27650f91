use std::cell::Cell;
use std::rc::Rc;
use web_sys::{AbortController, AbortSignal};
use yew::prelude::*;

/// Abort handle shared by every request a page issues. Once cancelled, the
/// in-flight fetches are aborted and their results must not touch state.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    controller: Option<AbortController>,
    cancelled: Rc<Cell<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        let controller = AbortController::new()
            .map_err(|e| log::warn!("AbortController unavailable: {e:?}"))
            .ok();
        Self {
            controller,
            cancelled: Rc::new(Cell::new(false)),
        }
    }

    /// Token without a browser controller. It only tracks the flag.
    pub fn detached() -> Self {
        Self::default()
    }

    pub fn signal(&self) -> Option<AbortSignal> {
        self.controller.as_ref().map(AbortController::signal)
    }

    pub fn cancel(&self) {
        if self.cancelled.replace(true) {
            return;
        }
        if let Some(controller) = &self.controller {
            controller.abort();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

impl PartialEq for CancelToken {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.cancelled, &other.cancelled)
    }
}

/// One token per mounted component, cancelled when the component unmounts.
#[hook]
pub fn use_cancel_token() -> CancelToken {
    let token = (*use_memo((), |_| CancelToken::new())).clone();
    {
        let token = token.clone();
        use_effect_with((), move |_| move || token.cancel());
    }
    token
}
