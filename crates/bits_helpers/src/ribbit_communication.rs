use std::sync::LazyLock;

use bevy::prelude::*;
use parking_lot::Mutex;
use ribbit_bits::{BitMessage, BitParameters, RibbitMessage};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;
#[cfg(target_arch = "wasm32")]
use web_sys::MessageEvent;

/// Messages received from the Ribbit host, drained once per frame.
pub static RIBBIT_MESSAGE_QUEUE: LazyLock<Mutex<Vec<RibbitMessage>>> =
    LazyLock::new(|| Mutex::new(Vec::new()));

/// Messages the bit sent while running natively, where there is no host page.
#[cfg(not(target_arch = "wasm32"))]
pub static BIT_MESSAGE_QUEUE: LazyLock<Mutex<Vec<BitMessage>>> =
    LazyLock::new(|| Mutex::new(Vec::new()));

#[cfg(target_arch = "wasm32")]
fn listen_ribbit_messages() {
    let Some(window) = web_sys::window() else {
        error!("No global `window`, Ribbit messages will be ignored");
        return;
    };

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        let message: Result<RibbitMessage, serde_wasm_bindgen::Error> =
            serde_wasm_bindgen::from_value(event.data());

        match message {
            Ok(message) => RIBBIT_MESSAGE_QUEUE.lock().push(message),
            Err(err) => error!("Could not parse ribbit message {:?}: {err}", event.data()),
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    if let Err(err) =
        window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
    {
        error!("Failed to add message event listener: {err:?}");
        return;
    }

    // The listener lives as long as the page.
    closure.forget();
}

#[cfg(not(target_arch = "wasm32"))]
pub fn send_bit_message(message: BitMessage) {
    debug!("Queued {message:?}");
    BIT_MESSAGE_QUEUE.lock().push(message);
}

#[cfg(target_arch = "wasm32")]
pub fn send_bit_message(message: BitMessage) {
    let Some(window) = web_sys::window() else {
        error!("{message:?} not sent, no global `window`");
        return;
    };
    let Ok(message_value) = serde_wasm_bindgen::to_value(&message) else {
        error!("Could not serialize {message:?}");
        return;
    };
    let Ok(Some(parent_window)) = window.parent() else {
        error!("{message:?} not sent, parent window not found");
        return;
    };

    if let Err(err) = parent_window.post_message(&message_value, "*") {
        error!("Could not post message {message_value:?}. {err:?}");
    }
}

/// Answers the requests the Ribbit host sends to a running bit.
///
/// These are called by [`RibbitCommunicationPlugin`], not by the bit itself.
pub trait RibbitMessageHandler: Send + Sync + Default + 'static {
    fn duration(world: &mut World) -> ribbit_bits::BitDuration;
    fn end(world: &mut World) -> ribbit_bits::BitResult;
    fn restart(world: &mut World);
}

fn process_ribbit_messages<T: RibbitMessageHandler>(world: &mut World) {
    let messages: Vec<_> = RIBBIT_MESSAGE_QUEUE.lock().drain(..).collect();

    for message in messages {
        match message {
            RibbitMessage::End => {
                let result = T::end(world);
                send_bit_message(BitMessage::End(result));
            }
            RibbitMessage::Parameters => {
                let duration = T::duration(world);
                send_bit_message(BitMessage::Parameters(BitParameters { duration }));
            }
            RibbitMessage::Restart => T::restart(world),
            RibbitMessage::Start => info!("Host started the bit"),
        }
    }
}

fn ready() {
    send_bit_message(BitMessage::Ready);
}

#[derive(Default)]
pub struct RibbitCommunicationPlugin<T: RibbitMessageHandler>(core::marker::PhantomData<T>);

impl<T: RibbitMessageHandler> Plugin for RibbitCommunicationPlugin<T> {
    fn build(&self, app: &mut App) {
        app.add_systems(PostUpdate, process_ribbit_messages::<T>);
        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, listen_ribbit_messages);
        app.add_systems(PostStartup, ready);
    }
}
