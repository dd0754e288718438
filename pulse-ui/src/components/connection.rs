//! Connection Badge
//!
//! Live-reload connection state, as shown in the footer.

use leptos::*;

use crate::channel::ChannelState;
use crate::state::use_runtime;

fn badge_class(state: ChannelState) -> &'static str {
    match state {
        ChannelState::Connecting => "badge badge-connecting",
        ChannelState::Open => "badge badge-open",
        ChannelState::Closed => "badge badge-closed",
    }
}

fn badge_label(state: ChannelState) -> &'static str {
    match state {
        ChannelState::Connecting => "Connecting",
        ChannelState::Open => "Live",
        // no reconnect; the user reloads the page
        ChannelState::Closed => "Disconnected (reload to retry)",
    }
}

#[component]
pub fn ConnectionBadge() -> impl IntoView {
    let runtime = use_runtime();
    let connection = runtime.connection;

    view! {
        <span class=move || badge_class(connection.get())>
            {move || badge_label(connection.get())}
        </span>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_state_has_distinct_class() {
        let classes = [
            badge_class(ChannelState::Connecting),
            badge_class(ChannelState::Open),
            badge_class(ChannelState::Closed),
        ];
        assert_ne!(classes[0], classes[1]);
        assert_ne!(classes[1], classes[2]);
        assert!(badge_label(ChannelState::Closed).contains("reload"));
    }
}
