use crate::router::Route;
use gloo_timers::callback::Timeout;
use std::cell::RefCell;
use std::rc::Rc;
use yew::prelude::*;
use yew_router::prelude::*;

const NOTICE_TTL_MS: u32 = 3_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }
}

/// Transient notification slot owned by one page.
#[derive(Clone)]
pub struct NoticeHandle {
    current: UseStateHandle<Option<Notice>>,
    expiry: Rc<RefCell<Option<Timeout>>>,
}

impl NoticeHandle {
    pub fn show(&self, notice: Notice) {
        match notice.kind {
            NoticeKind::Success => log::info!("{}", notice.text),
            NoticeKind::Error => log::warn!("{}", notice.text),
        }
        self.current.set(Some(notice));

        let current = self.current.clone();
        let timeout = Timeout::new(NOTICE_TTL_MS, move || current.set(None));
        // Replacing the old timeout cancels it.
        self.expiry.borrow_mut().replace(timeout);
    }

    pub fn success(&self, text: impl Into<String>) {
        self.show(Notice::success(text));
    }

    pub fn error(&self, text: impl Into<String>) {
        self.show(Notice::error(text));
    }

    pub fn current(&self) -> Option<Notice> {
        (*self.current).clone()
    }
}

#[hook]
pub fn use_notice() -> NoticeHandle {
    let current = use_state(|| None::<Notice>);
    let expiry = use_mut_ref(|| None::<Timeout>);
    NoticeHandle { current, expiry }
}

#[derive(Properties, PartialEq)]
pub struct NoticeBannerProps {
    pub notice: Option<Notice>,
}

#[function_component(NoticeBanner)]
pub fn notice_banner(props: &NoticeBannerProps) -> Html {
    match &props.notice {
        Some(Notice {
            kind: NoticeKind::Success,
            text,
        }) => html! {
            <div class="fixed top-4 left-1/2 -translate-x-1/2 bg-green-100 border border-green-400 text-green-700 px-4 py-3 rounded shadow z-50">
                { text }
            </div>
        },
        Some(Notice {
            kind: NoticeKind::Error,
            text,
        }) => html! {
            <div class="fixed top-4 left-1/2 -translate-x-1/2 bg-red-100 border border-red-400 text-red-700 px-4 py-3 rounded shadow z-50">
                { text }
            </div>
        },
        None => html! {},
    }
}

#[derive(Properties, PartialEq)]
pub struct DashboardLayoutProps {
    pub children: Children,
    pub title: String,
}

#[function_component(DashboardLayout)]
pub fn dashboard_layout(props: &DashboardLayoutProps) -> Html {
    html! {
        <div class="min-h-screen bg-gray-50">
            <nav class="bg-blue-900 text-white px-6 py-3 flex gap-6 items-center">
                <Link<Route> to={Route::Home} classes="font-bold">{"ISL"}</Link<Route>>
                <Link<Route> to={Route::Discussions} classes="hover:underline">{"Discussions"}</Link<Route>>
                <Link<Route> to={Route::Upload} classes="hover:underline">{"Upload"}</Link<Route>>
                <Link<Route> to={Route::Prediction} classes="hover:underline">{"Prediction"}</Link<Route>>
            </nav>
            <main class="max-w-6xl mx-auto px-6 py-8">
                <h1 class="sr-only">{&props.title}</h1>
                { for props.children.iter() }
            </main>
        </div>
    }
}
