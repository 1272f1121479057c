use super::types::{Country, Message};

/// Sự kiện từ các tác vụ nền gửi lên UI.
///
/// Every timer or fetch spawned on the runtime reports back through one of
/// these; the UI thread drains them once per frame and applies the matching
/// store mutation, so all mutations stay on a single thread.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// A mock AI reply finished its delay. `ticket` identifies the schedule
    /// that produced it so cancelled replies can be discarded.
    ReplyReady { ticket: u64, message: Message },
    /// A synthetic batch of older messages is ready to be prepended.
    HistoryLoaded { chatroom_id: String, batch: Vec<Message> },
    /// Simulated "OTP sent" latency elapsed.
    OtpSent,
    /// Result of comparing the entered code with the expected one.
    OtpChecked { accepted: bool },
    /// Country list fetch finished; `fallback` is set when the network
    /// request failed and the built-in list was used instead.
    CountriesLoaded { countries: Vec<Country>, fallback: bool },
}
