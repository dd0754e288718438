//! Live-Reload Channel
//!
//! Receive-only websocket to the agent. Every inbound message becomes exactly
//! one render request, delivered synchronously in receipt order. There is no
//! coalescing and no reconnect: once the socket closes the channel stays
//! `Closed` for the rest of the page session.

use leptos::*;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CloseEvent, Event, MessageEvent, WebSocket};

use crate::endpoint::Endpoint;
use crate::mode;

/// Connection lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Connecting,
    Open,
    Closed,
}

impl ChannelState {
    pub fn on_open(self) -> Self {
        match self {
            ChannelState::Connecting => ChannelState::Open,
            other => other,
        }
    }

    /// `Closed` is terminal
    pub fn on_close(self) -> Self {
        ChannelState::Closed
    }

    pub fn is_closed(self) -> bool {
        self == ChannelState::Closed
    }
}

impl fmt::Display for ChannelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelState::Connecting => f.write_str("connecting"),
            ChannelState::Open => f.write_str("open"),
            ChannelState::Closed => f.write_str("closed"),
        }
    }
}

/// One received message, numbered in receipt order starting at 1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSignal {
    pub sequence: u64,
}

/// Receiver of render requests
pub trait RenderSink {
    fn request_render(&self, signal: RenderSignal);
}

impl<F> RenderSink for F
where
    F: Fn(RenderSignal),
{
    fn request_render(&self, signal: RenderSignal) {
        self(signal)
    }
}

/// Turns socket events into state transitions and render requests
pub struct Dispatcher<S> {
    sink: S,
    state: ChannelState,
    delivered: u64,
}

impl<S: RenderSink> Dispatcher<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            state: ChannelState::Connecting,
            delivered: 0,
        }
    }

    pub fn state(&self) -> ChannelState {
        self.state
    }

    /// Messages delivered so far
    pub fn delivered(&self) -> u64 {
        self.delivered
    }

    pub fn opened(&mut self) -> ChannelState {
        self.state = self.state.on_open();
        self.state
    }

    pub fn closed(&mut self) -> ChannelState {
        self.state = self.state.on_close();
        self.state
    }

    /// Forward one inbound message to the sink.
    ///
    /// Returns `None` once the channel is closed.
    pub fn deliver(&mut self) -> Option<RenderSignal> {
        if self.state.is_closed() {
            return None;
        }
        self.delivered += 1;
        let signal = RenderSignal {
            sequence: self.delivered,
        };
        self.sink.request_render(signal);
        Some(signal)
    }
}

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("Cannot open websocket to {endpoint}: {reason}")]
    Connect { endpoint: String, reason: String },
}

/// Live subscription to the agent's signals.
///
/// Dropping it (or calling [`Subscription::unsubscribe`]) detaches the
/// handlers and closes the socket.
pub struct Subscription {
    socket: WebSocket,
    state: RwSignal<ChannelState>,
    active: bool,
    _on_open: Closure<dyn FnMut(Event)>,
    _on_message: Closure<dyn FnMut(MessageEvent)>,
    _on_close: Closure<dyn FnMut(CloseEvent)>,
    _on_error: Closure<dyn FnMut(Event)>,
}

impl Subscription {
    pub fn state(&self) -> ChannelState {
        self.state.get_untracked()
    }

    /// Stop listening now
    pub fn unsubscribe(self) {
        drop(self);
    }

    /// Keep listening for the rest of the page session
    pub fn persist(self) {
        std::mem::forget(self);
    }

    fn detach(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;

        self.socket.set_onopen(None);
        self.socket.set_onmessage(None);
        self.socket.set_onclose(None);
        self.socket.set_onerror(None);
        let _ = self.socket.close();
        self.state.set(ChannelState::Closed);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach();
    }
}

fn open_socket(url: &str) -> Result<WebSocket, ChannelError> {
    WebSocket::new(url).map_err(|e| ChannelError::Connect {
        endpoint: url.to_string(),
        reason: format!("{:?}", e),
    })
}

/// Open the live-reload socket and forward every message to `sink`.
///
/// `state` mirrors the connection lifecycle for the UI.
pub fn listen<S>(
    endpoint: &Endpoint,
    sink: S,
    state: RwSignal<ChannelState>,
) -> Result<Subscription, ChannelError>
where
    S: RenderSink + 'static,
{
    let socket = open_socket(endpoint.as_str())?;

    let dispatcher = Rc::new(RefCell::new(Dispatcher::new(sink)));
    state.set(ChannelState::Connecting);

    let dispatcher_open = Rc::clone(&dispatcher);
    let url = endpoint.to_string();
    let on_open = Closure::wrap(Box::new(move |_: Event| {
        web_sys::console::log_1(&format!("Live reload connected to {}", url).into());
        state.set(dispatcher_open.borrow_mut().opened());
    }) as Box<dyn FnMut(Event)>);
    socket.set_onopen(Some(on_open.as_ref().unchecked_ref()));

    let dispatcher_message = Rc::clone(&dispatcher);
    let on_message = Closure::wrap(Box::new(move |event: MessageEvent| {
        let delivered = dispatcher_message.borrow_mut().deliver();
        if mode::debug() {
            let text = event
                .data()
                .dyn_into::<js_sys::JsString>()
                .map(String::from);
            if let (Some(signal), Ok(text)) = (delivered, text) {
                web_sys::console::debug_1(
                    &format!("Render signal #{}: {}", signal.sequence, text).into(),
                );
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);
    socket.set_onmessage(Some(on_message.as_ref().unchecked_ref()));

    let dispatcher_close = Rc::clone(&dispatcher);
    let on_close = Closure::wrap(Box::new(move |event: CloseEvent| {
        web_sys::console::warn_1(
            &format!(
                "Live reload closed: code={}, reason={}",
                event.code(),
                event.reason()
            )
            .into(),
        );
        state.set(dispatcher_close.borrow_mut().closed());
    }) as Box<dyn FnMut(CloseEvent)>);
    socket.set_onclose(Some(on_close.as_ref().unchecked_ref()));

    let on_error = Closure::wrap(Box::new(move |e: Event| {
        web_sys::console::error_1(&format!("Live reload error: {:?}", e.type_()).into());
    }) as Box<dyn FnMut(Event)>);
    socket.set_onerror(Some(on_error.as_ref().unchecked_ref()));

    Ok(Subscription {
        socket,
        state,
        active: true,
        _on_open: on_open,
        _on_message: on_message,
        _on_close: on_close,
        _on_error: on_error,
    })
}
