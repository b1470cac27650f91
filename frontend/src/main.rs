mod api;
mod cancel;
mod capture;
mod components;
mod env_variable_utils;
mod feed;
mod logging;
mod profile;
mod router;
mod session;
mod upload;
mod utils;

use crate::env_variable_utils::{
    get_api_base_url, get_app_name, get_prediction_socket_url, is_debug_mode,
};
use crate::logging::init_logger;
use crate::router::{switch, Route};
use crate::session::Session;
use yew::prelude::*;
use yew_router::prelude::*;

#[function_component(App)]
pub fn app() -> Html {
    let session = use_memo((), |_| Session::from_storage());

    html! {
        <ContextProvider<Session> context={(*session).clone()}>
            <BrowserRouter>
                <Switch<Route> render={switch} />
            </BrowserRouter>
        </ContextProvider<Session>>
    }
}

fn main() {
    init_logger(is_debug_mode());
    log::info!(
        "NAME: \"{}\", API: \"{}\", SOCKET: \"{}\" DEBUG: \"{}\"",
        get_app_name(),
        get_api_base_url(),
        get_prediction_socket_url(),
        is_debug_mode()
    );

    yew::Renderer::<App>::new().render();
}
