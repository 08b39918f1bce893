use grammers_client::types::Peer;
use grammers_session::defs::PeerKind;
use grammers_tl_types as tl;
use tgdigest_core::models::{ChatEntity, ChatId, Folder};

pub(crate) fn peer_chat_id(peer: &Peer) -> ChatId {
    let id = peer.id();

    match id.kind() {
        PeerKind::Chat => ChatId::group(id.bare_id()),
        PeerKind::Channel => ChatId::channel(id.bare_id()),
        _ => ChatId::user(id.bare_id()),
    }
}

pub(crate) fn peer_entity(peer: &Peer) -> ChatEntity {
    let username = peer
        .username()
        .or_else(|| peer.usernames().first().cloned())
        .map(String::from);

    ChatEntity {
        id: Some(peer_chat_id(peer)),
        username,
    }
}

/// Folder members come as input peers. Self and empty peers have no chat id
/// to match against and are skipped.
pub(crate) fn input_peer_chat_id(peer: &tl::enums::InputPeer) -> Option<ChatId> {
    match peer {
        tl::enums::InputPeer::User(user) => Some(ChatId::user(user.user_id)),
        tl::enums::InputPeer::UserFromMessage(user) => Some(ChatId::user(user.user_id)),
        tl::enums::InputPeer::Chat(chat) => Some(ChatId::group(chat.chat_id)),
        tl::enums::InputPeer::Channel(channel) => Some(ChatId::channel(channel.channel_id)),
        tl::enums::InputPeer::ChannelFromMessage(channel) => {
            Some(ChatId::channel(channel.channel_id))
        }
        _ => None,
    }
}

/// Only user-defined folders; the default "All chats" entry and shared
/// chatlists are skipped.
pub(crate) fn folder_from_filter(filter: tl::enums::DialogFilter) -> Option<Folder> {
    match filter {
        tl::enums::DialogFilter::Filter(filter) => Some(Folder {
            id: filter.id,
            title: plain_text(filter.title),
            included_chats: filter
                .include_peers
                .iter()
                .filter_map(input_peer_chat_id)
                .collect(),
        }),
        _ => None,
    }
}

pub(crate) fn plain_text(text: tl::enums::TextWithEntities) -> String {
    let tl::enums::TextWithEntities::Entities(text) = text;
    text.text
}

pub(crate) fn unread_count(dialog: &tl::enums::Dialog) -> u32 {
    match dialog {
        tl::enums::Dialog::Dialog(dialog) => dialog.unread_count.max(0) as u32,
        tl::enums::Dialog::Folder(_) => 0,
    }
}
