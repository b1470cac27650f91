use crate::api::{ApiClient, ApiError};
use crate::cancel::use_cancel_token;
use crate::components::{use_notice, DashboardLayout, NoticeBanner, NoticeHandle};
use crate::feed::api::{add_comment, create_post, delete_comment, delete_post, like_post, list_posts};
use crate::feed::components::{NewPostForm, PostCard};
use crate::feed::models::{CommentDraft, NewPost};
use crate::feed::state::{FeedAction, FeedState};
use crate::session::Session;
use crate::utils::confirm;
use yew::prelude::*;

pub mod api;
pub mod components;
pub mod models;
pub mod state;

fn report_failure(notice: &NoticeHandle, context: &str, error: &ApiError, text: &str) {
    if error.is_aborted() {
        return;
    }
    log::error!("{context}: {error}");
    notice.error(text);
}

#[function_component(CommunityFeed)]
pub fn community_feed() -> Html {
    let session = use_context::<Session>().unwrap_or_default();
    let client = use_memo((), |_| ApiClient::default());
    let cancel = use_cancel_token();
    let notice = use_notice();

    let feed = use_reducer(FeedState::default);
    let loading = use_state(|| true);
    let load_error = use_state(|| None::<String>);
    let new_post = use_state(NewPost::default);
    let comment_draft = use_state(CommentDraft::default);

    // Load posts on component mount
    {
        let client = client.clone();
        let cancel = cancel.clone();
        let dispatcher = feed.dispatcher();
        let loading = loading.clone();
        let load_error = load_error.clone();

        use_effect_with((), move |_| {
            wasm_bindgen_futures::spawn_local(async move {
                match list_posts(&client, &cancel).await {
                    Ok(posts) => {
                        log::debug!("Loaded {} posts", posts.len());
                        dispatcher.dispatch(FeedAction::Loaded(posts));
                    }
                    Err(e) if e.is_aborted() => return,
                    Err(e) => {
                        log::error!("Error fetching posts: {e}");
                        load_error.set(Some(
                            "Failed to fetch posts. Please try again later.".to_string(),
                        ));
                    }
                }
                loading.set(false);
            });
            || ()
        });
    }

    let on_draft_change = {
        let new_post = new_post.clone();
        Callback::from(move |draft: NewPost| new_post.set(draft))
    };

    let on_add_post = {
        let client = client.clone();
        let cancel = cancel.clone();
        let session = session.clone();
        let notice = notice.clone();
        let dispatcher = feed.dispatcher();
        let new_post = new_post.clone();

        Callback::from(move |_| {
            let post = match new_post.validated() {
                Ok(post) => post,
                Err(e) => {
                    notice.error(e.to_string());
                    return;
                }
            };

            let client = client.clone();
            let cancel = cancel.clone();
            let session = session.clone();
            let notice = notice.clone();
            let dispatcher = dispatcher.clone();
            let new_post = new_post.clone();

            wasm_bindgen_futures::spawn_local(async move {
                match create_post(&client, &session, &post, &cancel).await {
                    Ok(created) => {
                        dispatcher.dispatch(FeedAction::Created(created));
                        new_post.set(NewPost::default());
                        notice.success("Post added successfully!");
                    }
                    Err(e) => report_failure(&notice, "Error adding post", &e, "Failed to add post."),
                }
            });
        })
    };

    let on_like = {
        let client = client.clone();
        let cancel = cancel.clone();
        let dispatcher = feed.dispatcher();

        Callback::from(move |post_id: String| {
            let client = client.clone();
            let cancel = cancel.clone();
            let dispatcher = dispatcher.clone();

            wasm_bindgen_futures::spawn_local(async move {
                match like_post(&client, &post_id, &cancel).await {
                    Ok(updated) => dispatcher.dispatch(FeedAction::Updated(updated)),
                    Err(e) if e.is_aborted() => {}
                    Err(e) => log::error!("Error liking post: {e}"),
                }
            });
        })
    };

    let on_delete_post = {
        let client = client.clone();
        let cancel = cancel.clone();
        let session = session.clone();
        let notice = notice.clone();
        let dispatcher = feed.dispatcher();

        Callback::from(move |post_id: String| {
            if !confirm("Are you sure you want to delete this post?") {
                return;
            }

            let client = client.clone();
            let cancel = cancel.clone();
            let session = session.clone();
            let notice = notice.clone();
            let dispatcher = dispatcher.clone();

            wasm_bindgen_futures::spawn_local(async move {
                match delete_post(&client, &session, &post_id, &cancel).await {
                    Ok(()) => {
                        dispatcher.dispatch(FeedAction::Deleted(post_id));
                        notice.success("Post deleted successfully!");
                    }
                    Err(e) => report_failure(
                        &notice,
                        "Error deleting post",
                        &e,
                        "Failed to delete the post.",
                    ),
                }
            });
        })
    };

    let on_toggle_comments = {
        let dispatcher = feed.dispatcher();
        Callback::from(move |post_id: String| dispatcher.dispatch(FeedAction::ToggleComments(post_id)))
    };

    let on_comment_input = {
        let comment_draft = comment_draft.clone();
        Callback::from(move |(post_id, content): (String, String)| {
            comment_draft.set(CommentDraft::edit(&post_id, content));
        })
    };

    let on_add_comment = {
        let client = client.clone();
        let cancel = cancel.clone();
        let session = session.clone();
        let notice = notice.clone();
        let dispatcher = feed.dispatcher();
        let comment_draft = comment_draft.clone();

        Callback::from(move |post_id: String| {
            let request = match comment_draft.request_for(&post_id) {
                Ok(request) => request,
                Err(e) => {
                    notice.error(e.to_string());
                    return;
                }
            };

            let client = client.clone();
            let cancel = cancel.clone();
            let session = session.clone();
            let notice = notice.clone();
            let dispatcher = dispatcher.clone();
            let comment_draft = comment_draft.clone();

            wasm_bindgen_futures::spawn_local(async move {
                match add_comment(&client, &session, &request, &cancel).await {
                    Ok(updated) => {
                        dispatcher.dispatch(FeedAction::Updated(updated));
                        comment_draft.set(CommentDraft::default());
                        notice.success("Comment added successfully!");
                    }
                    Err(e) => report_failure(
                        &notice,
                        "Error adding comment",
                        &e,
                        "Failed to add comment.",
                    ),
                }
            });
        })
    };

    let on_delete_comment = {
        let client = client.clone();
        let cancel = cancel.clone();
        let session = session.clone();
        let notice = notice.clone();
        let dispatcher = feed.dispatcher();

        Callback::from(move |(post_id, comment_id): (String, String)| {
            if !confirm("Are you sure you want to delete this comment?") {
                return;
            }

            let client = client.clone();
            let cancel = cancel.clone();
            let session = session.clone();
            let notice = notice.clone();
            let dispatcher = dispatcher.clone();

            wasm_bindgen_futures::spawn_local(async move {
                match delete_comment(&client, &session, &post_id, &comment_id, &cancel).await {
                    Ok(comments) => {
                        dispatcher.dispatch(FeedAction::CommentsReplaced { post_id, comments });
                        notice.success("Comment deleted successfully!");
                    }
                    Err(e) => report_failure(
                        &notice,
                        "Error deleting comment",
                        &e,
                        "Failed to delete the comment.",
                    ),
                }
            });
        })
    };

    if *loading {
        return html! {
            <div class="flex justify-center items-center h-screen bg-blue-50">
                <div class="text-xl font-bold text-blue-700">{"Loading posts..."}</div>
            </div>
        };
    }

    if let Some(msg) = &*load_error {
        return html! {
            <div class="flex justify-center items-center h-screen bg-blue-50">
                <div class="text-red-600 font-semibold">{ msg }</div>
            </div>
        };
    }

    html! {
        <DashboardLayout title="Community Feed">
            <NoticeBanner notice={notice.current()} />
            <div class="space-y-8">
                <div class="bg-blue-100 p-6 rounded-lg shadow-lg flex flex-col items-center text-center">
                    <h1 class="text-3xl font-bold text-blue-800">{"Welcome to the Community Feed"}</h1>
                    <p class="text-lg text-gray-700 mt-2">
                        {"Join discussions, share your thoughts, and connect with others!"}
                    </p>
                </div>

                <NewPostForm
                    draft={(*new_post).clone()}
                    on_change={on_draft_change}
                    on_submit={on_add_post}
                />

                {
                    if feed.posts.is_empty() {
                        html! { <div class="text-center text-gray-600">{"No posts available"}</div> }
                    } else {
                        html! {
                            <div class="space-y-6">
                                {
                                    feed.posts.iter().map(|post| html! {
                                        <PostCard
                                            key={post.id.clone()}
                                            post={post.clone()}
                                            comments_visible={feed.comments_visible(&post.id)}
                                            comment_draft={comment_draft.content_for(&post.id).to_string()}
                                            on_like={on_like.clone()}
                                            on_delete={on_delete_post.clone()}
                                            on_toggle_comments={on_toggle_comments.clone()}
                                            on_comment_input={on_comment_input.clone()}
                                            on_add_comment={on_add_comment.clone()}
                                            on_delete_comment={on_delete_comment.clone()}
                                        />
                                    }).collect::<Html>()
                                }
                            </div>
                        }
                    }
                }
            </div>
        </DashboardLayout>
    }
}
