use crate::feed::models::{display_name, Comment, NewPost, Post};
use crate::utils::{format_iso8601_date, format_number};
use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct NewPostFormProps {
    pub draft: NewPost,
    pub on_change: Callback<NewPost>,
    pub on_submit: Callback<()>,
}

#[function_component(NewPostForm)]
pub fn new_post_form(props: &NewPostFormProps) -> Html {
    let on_title = {
        let draft = props.draft.clone();
        let on_change = props.on_change.clone();
        Callback::from(move |e: InputEvent| {
            let title = e.target_unchecked_into::<HtmlInputElement>().value();
            on_change.emit(NewPost {
                title,
                ..draft.clone()
            });
        })
    };

    let on_content = {
        let draft = props.draft.clone();
        let on_change = props.on_change.clone();
        Callback::from(move |e: InputEvent| {
            let content = e.target_unchecked_into::<HtmlTextAreaElement>().value();
            on_change.emit(NewPost {
                content,
                ..draft.clone()
            });
        })
    };

    let on_submit = {
        let on_submit = props.on_submit.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            on_submit.emit(());
        })
    };

    html! {
        <div class="bg-white shadow-lg p-6 rounded-lg">
            <form onsubmit={on_submit} class="space-y-4">
                <input
                    type="text"
                    class="w-full p-3 border border-gray-300 rounded"
                    placeholder="Enter post title"
                    value={props.draft.title.clone()}
                    oninput={on_title}
                />
                <textarea
                    class="w-full p-3 border border-gray-300 rounded"
                    placeholder="Write your post here..."
                    rows="4"
                    value={props.draft.content.clone()}
                    oninput={on_content}
                />
                <button type="submit" class="w-full bg-blue-900 hover:bg-blue-700 text-white p-3 rounded">
                    {"Add Post"}
                </button>
            </form>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct PostCardProps {
    pub post: Post,
    pub comments_visible: bool,
    pub comment_draft: String,
    pub on_like: Callback<String>,
    pub on_delete: Callback<String>,
    pub on_toggle_comments: Callback<String>,
    pub on_comment_input: Callback<(String, String)>,
    pub on_add_comment: Callback<String>,
    pub on_delete_comment: Callback<(String, String)>,
}

#[function_component(PostCard)]
pub fn post_card(props: &PostCardProps) -> Html {
    let post = &props.post;
    let post_id = post.id.clone();

    let on_like = {
        let post_id = post_id.clone();
        let on_like = props.on_like.clone();
        Callback::from(move |_: MouseEvent| on_like.emit(post_id.clone()))
    };
    let on_delete = {
        let post_id = post_id.clone();
        let on_delete = props.on_delete.clone();
        Callback::from(move |_: MouseEvent| on_delete.emit(post_id.clone()))
    };
    let on_toggle = {
        let post_id = post_id.clone();
        let on_toggle = props.on_toggle_comments.clone();
        Callback::from(move |_: MouseEvent| on_toggle.emit(post_id.clone()))
    };

    html! {
        <div class="bg-white shadow-lg p-6 rounded-lg">
            <div class="flex justify-between items-center">
                <span class="text-sm font-medium">{display_name(post.username.as_deref())}</span>
                <button onclick={on_delete} class="bg-red-600 hover:bg-red-700 text-white text-sm px-3 py-1 rounded">
                    {"Delete Post"}
                </button>
            </div>
            <h2 class="text-xl font-semibold mt-4">{&post.title}</h2>
            <p class="text-gray-700 mt-2">{&post.content}</p>
            <div class="mt-4 flex justify-between">
                <button onclick={on_like} class="border border-gray-400 text-sm px-3 py-1 rounded">
                    {format!("Like ({})", format_number(post.likes))}
                </button>
                <span class="text-sm text-gray-500">{format_iso8601_date(&post.created_at)}</span>
            </div>
            <button onclick={on_toggle} class="text-sm text-blue-600 hover:underline mt-4">
                { if props.comments_visible { "Hide comments" } else { "Show comments" } }
            </button>
            {
                if props.comments_visible {
                    html! {
                        <CommentThread
                            post_id={post_id.clone()}
                            comments={post.comments.clone()}
                            draft={props.comment_draft.clone()}
                            on_input={props.on_comment_input.clone()}
                            on_add={props.on_add_comment.clone()}
                            on_delete={props.on_delete_comment.clone()}
                        />
                    }
                } else {
                    html! {}
                }
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct CommentThreadProps {
    pub post_id: String,
    pub comments: Vec<Comment>,
    pub draft: String,
    pub on_input: Callback<(String, String)>,
    pub on_add: Callback<String>,
    pub on_delete: Callback<(String, String)>,
}

#[function_component(CommentThread)]
pub fn comment_thread(props: &CommentThreadProps) -> Html {
    let on_input = {
        let post_id = props.post_id.clone();
        let on_input = props.on_input.clone();
        Callback::from(move |e: InputEvent| {
            let content = e.target_unchecked_into::<HtmlTextAreaElement>().value();
            on_input.emit((post_id.clone(), content));
        })
    };
    let on_add = {
        let post_id = props.post_id.clone();
        let on_add = props.on_add.clone();
        Callback::from(move |_: MouseEvent| on_add.emit(post_id.clone()))
    };

    html! {
        <div class="space-y-4 mt-4">
            {
                props.comments.iter().map(|comment| {
                    let on_delete = {
                        let ids = (props.post_id.clone(), comment.id.clone());
                        let on_delete = props.on_delete.clone();
                        Callback::from(move |_: MouseEvent| on_delete.emit(ids.clone()))
                    };
                    html! {
                        <div key={comment.id.clone()} class="p-4 bg-gray-100 rounded-lg">
                            <div class="flex justify-between">
                                <span class="text-sm text-gray-800">{display_name(comment.username.as_deref())}</span>
                                <button onclick={on_delete} class="bg-red-600 text-white text-xs px-2 py-1 rounded">
                                    {"Delete"}
                                </button>
                            </div>
                            <p class="text-sm mt-2">{&comment.content}</p>
                        </div>
                    }
                }).collect::<Html>()
            }
            <textarea
                class="w-full p-3 border border-gray-300 rounded"
                placeholder="Add a comment..."
                rows="2"
                value={props.draft.clone()}
                oninput={on_input}
            />
            <button onclick={on_add} class="bg-blue-900 hover:bg-blue-700 text-white text-sm px-3 py-1 rounded mt-2">
                {"Add Comment"}
            </button>
        </div>
    }
}
