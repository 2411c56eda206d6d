//! Fakes shared by the handler and expiry tests.

use std::{sync::Mutex, time::Duration};

use async_trait::async_trait;

use blogbot_core::{
    card::{render, CardStyle},
    domain::{ChatId, MessageId, MessageRef},
    fetch::ExcerptFormat,
    messaging::{port::MessagingPort, types::InlineKeyboard},
    model::PostRecord,
    pager::{paginate, PagerState},
    Result,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Edit(MessageRef, String),
    Clear(MessageRef),
    Answer(String, Option<String>),
}

/// Records the calls the pager paths make; sends are not expected here.
#[derive(Default)]
pub struct FakeMessenger {
    calls: Mutex<Vec<Call>>,
}

impl FakeMessenger {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clears(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Clear(_)))
            .count()
    }
}

#[async_trait]
impl MessagingPort for FakeMessenger {
    async fn send_html(&self, chat_id: ChatId, _html: &str) -> Result<MessageRef> {
        Ok(MessageRef {
            chat_id,
            message_id: MessageId(0),
        })
    }

    async fn send_inline_keyboard(
        &self,
        chat_id: ChatId,
        _html: &str,
        _keyboard: InlineKeyboard,
    ) -> Result<MessageRef> {
        Ok(MessageRef {
            chat_id,
            message_id: MessageId(0),
        })
    }

    async fn edit_inline_keyboard(
        &self,
        msg: MessageRef,
        html: &str,
        _keyboard: InlineKeyboard,
    ) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Edit(msg, html.to_string()));
        Ok(())
    }

    async fn clear_keyboard(&self, msg: MessageRef) -> Result<()> {
        self.calls.lock().unwrap().push(Call::Clear(msg));
        Ok(())
    }

    async fn answer_callback_query(&self, callback_id: &str, text: Option<&str>) -> Result<()> {
        self.calls.lock().unwrap().push(Call::Answer(
            callback_id.to_string(),
            text.map(str::to_string),
        ));
        Ok(())
    }
}

pub fn msg() -> MessageRef {
    MessageRef {
        chat_id: ChatId(7),
        message_id: MessageId(42),
    }
}

/// A pager over `n` titled cards, anchored at the tokio clock's `now`.
pub fn pager(n: usize) -> PagerState {
    let style = CardStyle {
        excerpt_format: ExcerptFormat::Plain,
        footer: "Source: blog.example".to_string(),
    };
    let cards = (0..n)
        .map(|i| render(&PostRecord::new(Some(format!("post {i}")), None, None), &style))
        .collect();
    paginate(cards, Duration::from_secs(60), crate::clock_now()).unwrap()
}
