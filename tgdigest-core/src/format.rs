use std::fmt::Write;

use crate::models::UnreadChat;

pub const SUMMARIZATION_PROMPT: &str = r#"
Ты мой личный ассистент и суммаризируешь телеграм чаты.
Я отправлю тебе сообщения из чатов и тебе нужно их прочитать и очень коротко рассказать что я пропустил по каждому чату, выделяя только главные мысли
Так же не нужно давать пользователю id сообщения, а кидай ссылку на сообщение

Пиши так, используй как шаблон:
<оригинальный Тайтл канала> - если на один канал несколько сообщений, оставляй под одним тайтлом и все
<Самая главная суть сообщения, о чем оно, не больше 10 слов> - <ссылка на сообщение>
<Суммаризация сообщения, желательно не больше 2х предложений>

Далее отправляю тебе сообщения
"#;

pub const DIGEST_HEADER: &str = "# 📝 Сводка непрочитанных сообщений";

pub const DIGEST_FOOTER: &str = "_Сгенерировано с помощью TG Digest_";

/// Appends every chat with its messages to the instruction template.
pub fn build_prompt<C>(template: &str, chats: &[UnreadChat<C>]) -> String {
    let mut prompt = template.to_string();

    for chat in chats {
        let _ = write!(
            prompt,
            "\n\n{} ({} непрочитанных сообщений):\n",
            chat.title, chat.unread_count
        );

        for message in &chat.messages {
            let _ = write!(
                prompt,
                "msg id {}\n {}\n link: {}\n\n",
                message.id, message.content, message.permalink
            );
        }
    }

    prompt
}

pub fn wrap_digest(body: &str) -> String {
    format!("\n{DIGEST_HEADER}\n\n{body}\n\n{DIGEST_FOOTER}\n")
}

/// Footer for the last part of a digest that was split into several messages.
pub fn sign_last_chunk(chunk: &str) -> String {
    format!("{chunk}\n{DIGEST_FOOTER}")
}
