#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use outfitter_core::{StaticLocalizer, TargetId};
use outfitter_engine::{
    BackendChannel, ChannelError, CredentialPrompt, EngineConfig, FlowContext, FlowController,
    ModalHandle, ModalHost, PageHost,
};
use serde_json::{json, Value};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(flow_logging::initialize_for_tests);
}

/// In-memory RPC channel fed from per-method response queues. The final
/// response of a queue is sticky, so an open-ended polling loop keeps
/// receiving it.
#[derive(Default)]
pub struct ScriptedChannel {
    queues: Mutex<HashMap<String, VecDeque<Result<Value, ChannelError>>>>,
    sticky: Mutex<HashMap<String, Result<Value, ChannelError>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedChannel {
    pub fn push(&self, method: &str, response: Result<Value, ChannelError>) {
        self.queues
            .lock()
            .unwrap()
            .entry(method.to_string())
            .or_default()
            .push_back(response);
    }

    pub fn push_ok(&self, method: &str, value: Value) {
        self.push(method, Ok(value));
    }

    pub fn calls(&self, method: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|name| name.as_str() == method)
            .count()
    }
}

#[async_trait]
impl BackendChannel for ScriptedChannel {
    async fn call(&self, method: &str, _params: Value) -> Result<Value, ChannelError> {
        self.calls.lock().unwrap().push(method.to_string());
        let next = self
            .queues
            .lock()
            .unwrap()
            .get_mut(method)
            .and_then(VecDeque::pop_front);
        match next {
            Some(response) => {
                self.sticky
                    .lock()
                    .unwrap()
                    .insert(method.to_string(), response.clone());
                response
            }
            None => self
                .sticky
                .lock()
                .unwrap()
                .get(method)
                .cloned()
                .unwrap_or_else(|| {
                    Err(ChannelError::Transport(format!("unscripted method {method}")))
                }),
        }
    }
}

/// Prompt driver fed from a queue of scripted entries; records the inline
/// error shown at each invocation. An exhausted queue cancels.
pub struct ScriptedPrompt {
    responses: Mutex<VecDeque<Option<String>>>,
    seen_errors: Mutex<Vec<Option<String>>>,
}

impl ScriptedPrompt {
    pub fn new(responses: Vec<Option<&str>>) -> Self {
        Self {
            responses: Mutex::new(
                responses
                    .into_iter()
                    .map(|entry| entry.map(str::to_string))
                    .collect(),
            ),
            seen_errors: Mutex::new(Vec::new()),
        }
    }

    pub fn times_invoked(&self) -> usize {
        self.seen_errors.lock().unwrap().len()
    }

    pub fn seen_errors(&self) -> Vec<Option<String>> {
        self.seen_errors.lock().unwrap().clone()
    }
}

#[async_trait]
impl CredentialPrompt for ScriptedPrompt {
    async fn request(&self, _target: TargetId, error: Option<&str>) -> Option<String> {
        self.seen_errors
            .lock()
            .unwrap()
            .push(error.map(str::to_string));
        self.responses.lock().unwrap().pop_front().flatten()
    }
}

/// Prompt driver that never resolves, for exercising the bounded wait on
/// the system-wide active-prompt flag.
pub struct HangingPrompt;

#[async_trait]
impl CredentialPrompt for HangingPrompt {
    async fn request(&self, _target: TargetId, _error: Option<&str>) -> Option<String> {
        std::future::pending().await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalEvent {
    Opened(String),
    Updated(String),
    Closed,
}

#[derive(Default)]
pub struct RecordingModal {
    events: Mutex<Vec<ModalEvent>>,
    next_handle: AtomicU64,
}

impl RecordingModal {
    pub fn events(&self) -> Vec<ModalEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn updates(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ModalEvent::Updated(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn close_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| matches!(event, ModalEvent::Closed))
            .count()
    }
}

impl ModalHost for RecordingModal {
    fn open(&self, _title: &str, body: &str) -> Option<ModalHandle> {
        self.events
            .lock()
            .unwrap()
            .push(ModalEvent::Opened(body.to_string()));
        Some(self.next_handle.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn update(&self, _handle: ModalHandle, text: &str) {
        self.events
            .lock()
            .unwrap()
            .push(ModalEvent::Updated(text.to_string()));
    }

    fn close(&self, _handle: ModalHandle) {
        self.events.lock().unwrap().push(ModalEvent::Closed);
    }
}

#[derive(Default)]
pub struct RecordingPage {
    target: Mutex<Option<TargetId>>,
    anchor: AtomicBool,
    actions: Mutex<Vec<String>>,
}

impl RecordingPage {
    pub fn with_target(target: TargetId) -> Self {
        Self {
            target: Mutex::new(Some(target)),
            ..Self::default()
        }
    }

    pub fn set_anchor(&self, present: bool) {
        self.anchor.store(present, Ordering::SeqCst);
    }

    pub fn actions(&self) -> Vec<String> {
        self.actions.lock().unwrap().clone()
    }

    fn record(&self, action: impl Into<String>) {
        self.actions.lock().unwrap().push(action.into());
    }
}

impl PageHost for RecordingPage {
    fn current_target(&self) -> Option<TargetId> {
        *self.target.lock().unwrap()
    }

    fn has_trigger_anchor(&self) -> bool {
        self.anchor.load(Ordering::SeqCst)
    }

    fn install_trigger(&self, target: TargetId, attached: bool) {
        self.anchor.store(true, Ordering::SeqCst);
        self.record(format!("install:{target}:{attached}"));
    }

    fn set_trigger_busy(&self, busy: bool) {
        self.record(if busy { "busy" } else { "idle" });
    }

    fn remove_trigger(&self) {
        self.anchor.store(false, Ordering::SeqCst);
        self.record("removed");
    }

    fn reset_trigger(&self) {
        self.record("reset");
    }

    fn schedule_rescan(&self) {
        self.record("rescan");
    }
}

pub struct Harness {
    pub channel: Arc<ScriptedChannel>,
    pub prompt: Arc<ScriptedPrompt>,
    pub modal: Arc<RecordingModal>,
    pub page: Arc<RecordingPage>,
    pub ctx: Arc<FlowContext>,
    pub controller: Arc<FlowController>,
}

pub fn harness(prompt_responses: Vec<Option<&str>>) -> Harness {
    harness_with(EngineConfig::default(), prompt_responses)
}

pub fn harness_with(config: EngineConfig, prompt_responses: Vec<Option<&str>>) -> Harness {
    init_logging();
    let channel = Arc::new(ScriptedChannel::default());
    let prompt = Arc::new(ScriptedPrompt::new(prompt_responses));
    let modal = Arc::new(RecordingModal::default());
    let page = Arc::new(RecordingPage::with_target(7));
    let ctx = Arc::new(FlowContext::new(
        channel.clone(),
        config,
        prompt.clone(),
        Arc::new(StaticLocalizer),
    ));
    let controller = Arc::new(FlowController::new(ctx.clone(), page.clone(), modal.clone()));
    Harness {
        channel,
        prompt,
        modal,
        page,
        ctx,
        controller,
    }
}

pub fn credential_ok() -> Value {
    json!({
        "success": true,
        "hasKey": true,
        "isValid": true,
        "maskedKey": "ofk_01234567...89ab"
    })
}

pub fn credential_missing() -> Value {
    json!({ "success": true, "hasKey": false })
}

pub fn start_ok() -> Value {
    json!({ "success": true })
}

pub fn ack_ok() -> Value {
    json!({ "success": true })
}

pub fn job(tag: &str) -> Value {
    job_with(tag, json!({}))
}

pub fn job_with(tag: &str, extra: Value) -> Value {
    let mut state = serde_json::Map::new();
    state.insert("status".to_string(), json!(tag));
    if let Value::Object(map) = extra {
        state.extend(map);
    }
    json!({ "success": true, "state": Value::Object(state) })
}
