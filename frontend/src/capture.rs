use crate::cancel::use_cancel_token;
use crate::capture::api::request_rewrite;
use crate::capture::camera::{
    attach_stream, open_camera, release_stream, FrameSink, VideoFrameGrabber,
};
use crate::capture::channel::{ChannelEvent, PredictionChannel};
use crate::capture::protocol::{
    FrameProcessed, GenerateRequest, FRAME_PROCESSED_EVENT, PROCESS_FRAME_EVENT,
};
use crate::capture::sampler::SamplingLoop;
use crate::capture::state::{CaptureAction, CaptureState};
use crate::components::{use_notice, DashboardLayout, NoticeBanner};
use crate::env_variable_utils::{GENERATE_URL, PREDICTION_SOCKET_URL};
use serde_json::Value;
use web_sys::{HtmlInputElement, MediaStream};
use yew::prelude::*;

pub mod api;
pub mod camera;
pub mod channel;
pub mod protocol;
pub mod sampler;
pub mod socketio;
pub mod state;

impl FrameSink for PredictionChannel {
    fn send_frame(&self, frame: String) -> bool {
        self.emit(PROCESS_FRAME_EVENT, Value::String(frame))
    }
}

fn on_channel_event(event: ChannelEvent, dispatcher: &UseReducerDispatcher<CaptureState>) {
    match event {
        ChannelEvent::Connected => log::info!("Connected to prediction service"),
        ChannelEvent::Disconnected => log::warn!("Prediction service connection lost"),
        ChannelEvent::Event { name, payload } if name == FRAME_PROCESSED_EVENT => {
            match serde_json::from_value::<FrameProcessed>(payload) {
                Ok(reply) => dispatcher.dispatch(CaptureAction::FrameProcessed(reply)),
                Err(e) => log::warn!("Malformed '{FRAME_PROCESSED_EVENT}' payload: {e}"),
            }
        }
        ChannelEvent::Event { name, .. } => log::debug!("Ignoring '{name}' event"),
    }
}

#[function_component(IslTranslator)]
pub fn isl_translator() -> Html {
    let state = use_reducer(CaptureState::default);
    let notice = use_notice();
    let cancel = use_cancel_token();

    let video_ref = use_node_ref();
    let canvas_ref = use_node_ref();

    let channel = use_mut_ref(|| None::<PredictionChannel>);
    let sampling = use_mut_ref(SamplingLoop::default);
    let camera = use_mut_ref(|| None::<MediaStream>);
    // Bumped on every start and stop so a camera that opens late can tell it is stale.
    let epoch = use_mut_ref(|| 0_u64);

    // Connect once on mount; tear down everything on unmount
    {
        let dispatcher = state.dispatcher();
        let channel = channel.clone();
        let sampling = sampling.clone();
        let camera = camera.clone();
        let video_ref = video_ref.clone();

        use_effect_with((), move |_| {
            let on_event = Callback::from(move |event| on_channel_event(event, &dispatcher));
            match PredictionChannel::connect(&PREDICTION_SOCKET_URL, on_event) {
                Ok(connected) => {
                    channel.borrow_mut().replace(connected);
                }
                Err(e) => log::error!("Could not reach prediction service: {e}"),
            }

            move || {
                sampling.borrow_mut().stop();
                if let Some(stream) = camera.borrow_mut().take() {
                    release_stream(&video_ref, &stream);
                }
                if let Some(channel) = channel.borrow_mut().take() {
                    channel.close();
                }
            }
        });
    }

    let on_start = {
        let recording = state.recording;
        let dispatcher = state.dispatcher();
        let notice = notice.clone();
        let cancel = cancel.clone();
        let channel = channel.clone();
        let sampling = sampling.clone();
        let camera = camera.clone();
        let epoch = epoch.clone();
        let video_ref = video_ref.clone();
        let canvas_ref = canvas_ref.clone();

        Callback::from(move |_: MouseEvent| {
            if recording {
                return;
            }
            dispatcher.dispatch(CaptureAction::Started);
            let attempt = {
                let mut current = epoch.borrow_mut();
                *current += 1;
                *current
            };

            let dispatcher = dispatcher.clone();
            let notice = notice.clone();
            let cancel = cancel.clone();
            let channel = channel.clone();
            let sampling = sampling.clone();
            let camera = camera.clone();
            let epoch = epoch.clone();
            let video_ref = video_ref.clone();
            let canvas_ref = canvas_ref.clone();

            wasm_bindgen_futures::spawn_local(async move {
                let stream = match open_camera().await {
                    Ok(stream) => stream,
                    Err(e) => {
                        log::error!("Error accessing webcam: {e}");
                        if !cancel.is_cancelled() {
                            dispatcher.dispatch(CaptureAction::CameraFailed);
                            notice.error("Could not access the webcam.");
                        }
                        return;
                    }
                };

                if cancel.is_cancelled() || *epoch.borrow() != attempt {
                    log::debug!("Capture was stopped before the camera opened");
                    release_stream(&video_ref, &stream);
                    return;
                }

                attach_stream(&video_ref, &stream);
                if let Some(previous) = camera.borrow_mut().replace(stream) {
                    release_stream(&video_ref, &previous);
                }

                let grabber = VideoFrameGrabber {
                    video: video_ref,
                    canvas: canvas_ref,
                };
                sampling.borrow_mut().start(move |gate| {
                    let current = channel.borrow().clone();
                    if let Some(channel) = current {
                        gate.tick(&grabber, &channel);
                    }
                });
                log::info!("Webcam capture started");
            });
        })
    };

    let on_stop = {
        let dispatcher = state.dispatcher();
        let notice = notice.clone();
        let sampling = sampling.clone();
        let camera = camera.clone();
        let epoch = epoch.clone();
        let video_ref = video_ref.clone();

        Callback::from(move |_: MouseEvent| {
            *epoch.borrow_mut() += 1;
            sampling.borrow_mut().stop();
            if let Some(stream) = camera.borrow_mut().take() {
                release_stream(&video_ref, &stream);
            }
            dispatcher.dispatch(CaptureAction::Stopped);
            notice.success("Video recording stopped successfully!");
        })
    };

    let on_user_input = {
        let dispatcher = state.dispatcher();
        Callback::from(move |e: InputEvent| {
            let value = e.target_unchecked_into::<HtmlInputElement>().value();
            dispatcher.dispatch(CaptureAction::UserInput(value));
        })
    };

    let on_generate = {
        let dispatcher = state.dispatcher();
        let cancel = cancel.clone();
        let ready = state.can_generate();
        let request = GenerateRequest {
            sentence: state.user_input.clone(),
            emotion: state.label.clone(),
        };

        Callback::from(move |_: MouseEvent| {
            if !ready {
                return;
            }
            dispatcher.dispatch(CaptureAction::GenerateStarted);

            let dispatcher = dispatcher.clone();
            let cancel = cancel.clone();
            let request = request.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match request_rewrite(&GENERATE_URL, &request, &cancel).await {
                    Ok(response) => dispatcher.dispatch(CaptureAction::Generated(response)),
                    Err(e) if e.is_aborted() => return,
                    Err(e) => log::error!("Fetch error: {e}"),
                }
                dispatcher.dispatch(CaptureAction::GenerateFinished);
            });
        })
    };

    let input_class = "w-full p-3 border border-gray-300 rounded-lg focus:ring-2 focus:ring-blue-500";

    html! {
        <DashboardLayout title="ISL Translator">
            <NoticeBanner notice={notice.current()} />
            <div class="grid grid-cols-1 lg:grid-cols-2 gap-8">
                <div class="bg-white p-6 rounded-lg shadow-lg space-y-4">
                    <video
                        ref={video_ref.clone()}
                        class="w-full rounded-lg bg-black aspect-video"
                        autoplay=true
                        muted=true
                        playsinline=true
                    />
                    <canvas ref={canvas_ref.clone()} class="hidden" />
                    <div class="flex gap-4">
                        <button
                            onclick={on_start}
                            disabled={state.recording}
                            class="flex-1 bg-green-600 text-white py-2 rounded-lg hover:bg-green-700 disabled:opacity-50"
                        >
                            {"Start Recording"}
                        </button>
                        <button
                            onclick={on_stop}
                            disabled={!state.recording}
                            class="flex-1 bg-red-600 text-white py-2 rounded-lg hover:bg-red-700 disabled:opacity-50"
                        >
                            {"Stop Recording"}
                        </button>
                    </div>
                    <p class="text-sm text-gray-600">{ &state.status }</p>
                </div>

                <div class="bg-white p-6 rounded-lg shadow-lg space-y-4">
                    <div>
                        <label class="block text-gray-700 font-semibold mb-1">{"Facial Features"}</label>
                        <ul class="h-40 overflow-y-auto border border-gray-300 rounded-lg p-2 text-sm text-gray-700">
                            {
                                if state.features.is_empty() {
                                    html! { <li class="text-gray-400">{"No features detected yet"}</li> }
                                } else {
                                    state.features.iter().map(|line| html! { <li>{ line }</li> }).collect::<Html>()
                                }
                            }
                        </ul>
                    </div>

                    <div>
                        <label class="block text-gray-700 font-semibold mb-1">{"Detected Emotion"}</label>
                        <input type="text" readonly=true value={state.label.clone()} class={input_class} />
                    </div>

                    <div>
                        <label class="block text-gray-700 font-semibold mb-1">{"Your Sentence"}</label>
                        <input
                            type="text"
                            placeholder="Type the sentence you signed"
                            value={state.user_input.clone()}
                            oninput={on_user_input}
                            disabled={state.inputs_disabled}
                            class={input_class}
                        />
                    </div>

                    <button
                        onclick={on_generate}
                        disabled={!state.can_generate()}
                        class="w-full bg-blue-600 text-white py-3 rounded-lg hover:bg-blue-700 disabled:opacity-50"
                    >
                        { if state.generating { "Sending..." } else { "Send to GenAI" } }
                    </button>

                    <div>
                        <label class="block text-gray-700 font-semibold mb-1">{"Rewritten Sentence"}</label>
                        <input type="text" readonly=true value={state.rewritten_sentence.clone()} class={input_class} />
                    </div>

                    <div>
                        <label class="block text-gray-700 font-semibold mb-1">{"Non-Manual Features"}</label>
                        <ul class="list-disc list-inside text-gray-700">
                            { for state.non_manual_features.iter().map(|feature| html! { <li>{ feature }</li> }) }
                        </ul>
                    </div>
                </div>
            </div>
        </DashboardLayout>
    }
}
