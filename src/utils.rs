use anyhow::Result;
use futures_util::StreamExt;
use teloxide::{
    net::Download,
    prelude::*,
    types::{ChatId, MessageId},
    RequestError,
};

/// Default timeout in seconds for temporary messages.
pub const DEFAULT_DELETE_AFTER_TIMEOUT: u64 = 5;

/// Delete a message after the given delay in seconds.
pub fn delete_after(
    bot: Bot,
    chat_id: ChatId,
    message_id: MessageId,
    secs: u64,
) -> tokio::task::JoinHandle<()> {
    tracing::debug!(
        chat_id = chat_id.0,
        message_id = message_id.0,
        delay_secs = secs,
        "Scheduling message deletion"
    );
    tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_secs(secs)).await;
        if let Err(err) = bot.delete_message(chat_id, message_id).await {
            tracing::warn!(
                error = %err,
                chat_id = chat_id.0,
                message_id = message_id.0,
                "Failed to delete message",
            );
        }
    })
}

/// Send a notice that disappears after `secs` seconds.
pub async fn send_transient(
    bot: &Bot,
    chat_id: ChatId,
    text: impl Into<String>,
    secs: u64,
) -> Result<()> {
    let sent = bot.send_message(chat_id, text).await?;
    drop(delete_after(bot.clone(), sent.chat.id, sent.id, secs));
    Ok(())
}

/// Download a file from Telegram and return the raw bytes.
pub async fn download_file(bot: &Bot, path: &str) -> Result<Vec<u8>, RequestError> {
    let mut data = Vec::new();
    let mut stream = bot.download_file_stream(path);
    while let Some(chunk) = stream.next().await {
        data.extend_from_slice(&chunk?);
    }
    tracing::trace!(size = data.len(), "downloaded file bytes");
    Ok(data)
}

/// Fetch a Telegram file by its id and return the raw bytes.
pub async fn download_telegram_file(bot: &Bot, file_id: &str) -> Result<Vec<u8>> {
    let file = bot.get_file(file_id).await?;
    tracing::debug!(path = %file.path, "Downloading Telegram file");
    let bytes = download_file(bot, &file.path).await?;
    tracing::debug!(path = %file.path, size = bytes.len(), "Finished download");
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Client;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn test_bot(server: &MockServer) -> Bot {
        let client = Client::builder().no_proxy().build().unwrap();
        Bot::with_client("TEST", client).set_api_url(reqwest::Url::parse(&server.uri()).unwrap())
    }

    #[tokio::test]
    async fn download_telegram_file_gets_bytes() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/botTEST/GetFile"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"ok":true,"result":{"file_id":"f","file_unique_id":"u","file_path":"photos/invoice.jpg"}}"#,
                "application/json",
            ))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/file/botTEST/photos/invoice.jpg"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw("jpeg-bytes", "application/octet-stream"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let bot = test_bot(&server);
        let bytes = download_telegram_file(&bot, "f").await?;
        assert_eq!(bytes, b"jpeg-bytes");
        server.verify().await;
        Ok(())
    }

    #[tokio::test]
    async fn transient_notice_is_deleted() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/botTEST/SendMessage"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"ok":true,"result":{"message_id":7,"date":0,"chat":{"id":1,"type":"private"}}}"#,
                "application/json",
            ))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/botTEST/DeleteMessage"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(r#"{"ok":true,"result":true}"#, "application/json"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let bot = test_bot(&server);
        send_transient(&bot, ChatId(1), "try later", 0).await?;
        tokio::time::sleep(std::time::Duration::from_millis(200)).await;
        server.verify().await;
        Ok(())
    }
}
