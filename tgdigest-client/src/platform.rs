use futures::StreamExt;
use futures::stream::LocalBoxStream;
use grammers_client::InputMessage;
use grammers_client::types::Peer;
use grammers_tl_types as tl;
use tgdigest_core::models::{ChatEntity, ChatId, Dialog, Folder, RawMessage};
use tgdigest_core::platform::{ChatPlatform, DialogCursor, Formatting};

use crate::peer::{folder_from_filter, peer_chat_id, peer_entity, unread_count};
use crate::{ClientError, ClientResult, TelegramSession};

pub struct TelegramDialogs {
    inner: LocalBoxStream<'static, ClientResult<Dialog<Peer>>>,
}

impl DialogCursor for TelegramDialogs {
    type Chat = Peer;
    type Error = ClientError;

    async fn next_dialog(&mut self) -> ClientResult<Option<Dialog<Peer>>> {
        self.inner.next().await.transpose()
    }
}

impl TelegramSession {
    async fn find_dialog(&self, chat_id: ChatId) -> ClientResult<Peer> {
        let mut dialogs = self.iter_dialogs();

        while let Some(dialog) = dialogs.next_dialog().await? {
            if dialog.chat_id == chat_id {
                return Ok(dialog.chat);
            }
        }

        Err(ClientError::NotFound(chat_id.to_string()))
    }
}

impl ChatPlatform for TelegramSession {
    type Chat = Peer;
    type Error = ClientError;
    type Dialogs = TelegramDialogs;

    async fn resolve_chat(&self, identity: &str) -> ClientResult<Peer> {
        let identity = identity.trim();

        let peer = match identity {
            "me" | "self" => Peer::User(self.client.get_me().await?),
            _ => match identity.parse::<i64>() {
                Ok(marked) => self.find_dialog(ChatId::from_marked(marked)).await?,
                Err(_) => self.resolve_peer(identity.trim_start_matches('@')).await?,
            },
        };

        tracing::info!(
            %identity,
            chat_id = %peer_chat_id(&peer),
            "resolved output chat"
        );

        Ok(peer)
    }

    async fn list_folders(&self) -> ClientResult<Vec<Folder>> {
        let tl::enums::messages::DialogFilters::Filters(response) = self
            .client
            .invoke(&tl::functions::messages::GetDialogFilters {})
            .await?;

        Ok(response
            .filters
            .into_iter()
            .filter_map(folder_from_filter)
            .collect())
    }

    fn iter_dialogs(&self) -> TelegramDialogs {
        let dialogs = self.client.iter_dialogs();

        let inner = futures::stream::unfold(dialogs, |mut dialogs| async move {
            match dialogs.next().await {
                Ok(Some(dialog)) => {
                    let peer = dialog.peer();
                    let converted = Dialog {
                        chat_id: peer_chat_id(peer),
                        title: peer.name().unwrap_or_default().to_string(),
                        unread_count: unread_count(&dialog.raw),
                        chat: peer.clone(),
                    };
                    Some((Ok(converted), dialogs))
                }
                Ok(None) => None,
                Err(error) => Some((Err(ClientError::from(error)), dialogs)),
            }
        })
        .boxed_local();

        TelegramDialogs { inner }
    }

    async fn get_messages(&self, chat: &Peer, limit: usize) -> ClientResult<Vec<RawMessage>> {
        let mut messages = self.client.iter_messages(chat).limit(limit);
        let mut fetched = Vec::with_capacity(limit);

        while let Some(message) = messages.next().await? {
            fetched.push(RawMessage {
                id: message.id(),
                text: message
                    .action()
                    .is_none()
                    .then(|| message.text().to_string()),
            });
        }

        Ok(fetched)
    }

    async fn get_entity(&self, chat: &Peer) -> ClientResult<ChatEntity> {
        Ok(peer_entity(chat))
    }

    async fn send_message(
        &self,
        chat: &Peer,
        text: &str,
        formatting: Formatting,
    ) -> ClientResult<()> {
        let message = match formatting {
            Formatting::Plain => InputMessage::new().text(text),
            Formatting::Markdown => InputMessage::new().markdown(text),
        };

        self.client.send_message(chat, message).await?;

        Ok(())
    }
}
