use crate::api::ApiClient;
use crate::cancel::use_cancel_token;
use crate::components::DashboardLayout;
use crate::profile::api::load_profile;
use crate::profile::models::{ProfileData, UserVideo};
use crate::utils::format_iso8601_date;
use yew::prelude::*;

pub mod api;
pub mod models;

#[derive(Properties, PartialEq)]
pub struct ProfilePageProps {
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq)]
enum ProfileView {
    Loading,
    Loaded(ProfileData),
    Failed,
}

#[function_component(ProfilePage)]
pub fn profile_page(props: &ProfilePageProps) -> Html {
    let client = use_memo((), |_| ApiClient::default());
    let cancel = use_cancel_token();
    let view = use_state(|| ProfileView::Loading);

    // Refetch whenever the route parameter changes
    {
        let view = view.clone();
        let cancel = cancel.clone();
        use_effect_with(props.user_id.clone(), move |user_id| {
            let user_id = user_id.clone();
            view.set(ProfileView::Loading);
            wasm_bindgen_futures::spawn_local(async move {
                match load_profile(&client, &user_id, &cancel).await {
                    Ok(data) => view.set(ProfileView::Loaded(data)),
                    Err(e) if e.is_aborted() => {}
                    Err(e) => {
                        log::error!("Error fetching profile data: {e}");
                        view.set(ProfileView::Failed);
                    }
                }
            });
            || ()
        });
    }

    let body = match &*view {
        ProfileView::Loading => html! {
            <p class="text-center text-lg text-gray-600">{"Loading..."}</p>
        },
        ProfileView::Failed => html! {
            <p class="text-center text-red-600 font-semibold">{"Could not load this profile."}</p>
        },
        ProfileView::Loaded(data) => html! {
            <div class="space-y-8">
                <div class="border-b-2 border-gray-200 pb-5">
                    <h2 class="text-3xl font-bold text-gray-800">{ &data.user.username }</h2>
                    <p class="text-lg text-gray-600">{ format!("Email: {}", data.user.email) }</p>
                    <p class="text-gray-500">
                        { format!("Joined: {}", format_iso8601_date(&data.user.joined_at)) }
                    </p>
                </div>
                <div>
                    <h2 class="text-2xl font-semibold text-gray-800 mb-5">{"Uploaded Videos"}</h2>
                    {
                        if data.videos.is_empty() {
                            html! { <p class="text-center text-gray-500 mt-5">{"No videos uploaded yet."}</p> }
                        } else {
                            html! {
                                <div class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-3 gap-5">
                                    { for data.videos.iter().map(video_card) }
                                </div>
                            }
                        }
                    }
                </div>
            </div>
        },
    };

    html! {
        <DashboardLayout title="Profile">
            { body }
        </DashboardLayout>
    }
}

fn video_card(video: &UserVideo) -> Html {
    html! {
        <div key={video.id.clone()} class="border border-gray-200 rounded-lg p-3 shadow">
            <h3 class="text-xl text-gray-900 mb-2">{ &video.title }</h3>
            <p class="text-gray-600 mb-4">{ &video.description }</p>
            <video src={video.url.clone()} controls=true class="w-full rounded" />
        </div>
    }
}
