use crate::capture::IslTranslator;
use crate::env_variable_utils::get_app_name;
use crate::feed::CommunityFeed;
use crate::profile::ProfilePage;
use crate::upload::UploadVideo;
use yew::prelude::*;
use yew_router::prelude::*;

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/dashboard/discussions")]
    Discussions,
    #[at("/dashboard/upload")]
    Upload,
    #[at("/dashboard/prediction")]
    Prediction,
    #[at("/dashboard/profile/:user_id")]
    Profile { user_id: String },
    #[not_found]
    #[at("/404")]
    NotFound,
}

pub fn switch(routes: Route) -> Html {
    match routes {
        Route::Home => html! { <Landing /> },
        Route::Discussions => html! { <CommunityFeed /> },
        Route::Upload => html! { <UploadVideo /> },
        Route::Prediction => html! { <IslTranslator /> },
        Route::Profile { user_id } => html! { <ProfilePage {user_id} /> },
        Route::NotFound => html! {
            <div class="min-h-screen flex items-center justify-center bg-gray-700">
                <div class="bg-white p-8 rounded-lg shadow-lg text-center">
                    <h1 class="text-2xl font-bold text-gray-800 mb-4">{"404 - Page Not Found"}</h1>
                    <Link<Route> to={Route::Home} classes="text-blue-600 hover:underline">
                        {"Go back home"}
                    </Link<Route>>
                </div>
            </div>
        },
    }
}

#[function_component(Landing)]
pub fn landing() -> Html {
    let cards = [
        (Route::Discussions, "Community Feed", "Ask questions and share what you are learning."),
        (Route::Upload, "Upload a Video", "Contribute signed videos to the dataset."),
        (Route::Prediction, "ISL Translator", "Sign in front of your webcam and get live predictions."),
    ];

    html! {
        <div class="min-h-screen bg-blue-50 flex flex-col items-center justify-center px-6">
            <h1 class="text-4xl font-bold text-blue-900 mb-2">{ get_app_name() }</h1>
            <p class="text-lg text-gray-700 mb-10">{"Learn and translate Indian Sign Language."}</p>
            <div class="grid grid-cols-1 md:grid-cols-3 gap-6 max-w-5xl w-full">
                {
                    cards.into_iter().map(|(route, title, blurb)| html! {
                        <Link<Route> to={route} classes="bg-white p-6 rounded-lg shadow hover:shadow-lg transition">
                            <h2 class="text-xl font-semibold text-blue-800 mb-2">{ title }</h2>
                            <p class="text-gray-600">{ blurb }</p>
                        </Link<Route>>
                    }).collect::<Html>()
                }
            </div>
        </div>
    }
}
