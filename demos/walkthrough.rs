use std::io;

use messaging_sdk::{
    ApiKey, ContactUpdate, MessagingClient, MessagingError, NewContact, Pagination, SendMessage,
    WireContract,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let api_key = std::env::var("MESSAGING_API_KEY").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "MESSAGING_API_KEY environment variable is required",
        )
    })?;
    let contract: WireContract = std::env::var("MESSAGING_CONTRACT")
        .map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "MESSAGING_CONTRACT environment variable is required (A or B)",
            )
        })?
        .parse()?;
    let base_url = std::env::var("MESSAGING_BASE_URL")
        .unwrap_or_else(|_| "http://localhost:3000".to_owned());

    let client = MessagingClient::builder(ApiKey::new(api_key)?, contract)
        .base_url(base_url)
        .build()?;

    let contact = client
        .create_contact(NewContact::new("John Doe", "+1234567890"))
        .await?;
    tracing::info!(?contact, "created contact");
    let Some(contact_id) = contact.id else {
        return Err("server did not assign a contact id".into());
    };

    let contacts = client.list_contacts(Pagination::new(1, 10)).await?;
    for c in &contacts {
        tracing::info!(id = ?c.id, name = %c.name, phone = %c.phone, "listed contact");
    }

    let retrieved = client.get_contact(&contact_id).await?;
    tracing::info!(?retrieved, "retrieved contact");

    let updated = client
        .update_contact(
            &contact_id,
            ContactUpdate::default().name("Jane Doe").phone("+0987654321"),
        )
        .await?;
    tracing::info!(?updated, "updated contact");

    let message = client
        .send_message(SendMessage::new(
            "+1122334455",
            contact_id.clone(),
            "Hello from the messaging-sdk walkthrough!",
        ))
        .await?;
    tracing::info!(?message, "sent message");

    let messages = client.list_messages(Pagination::new(1, 10)).await?;
    for m in &messages {
        tracing::info!(id = ?m.id, to = %m.to, status = ?m.status, "listed message");
    }

    if let Some(message_id) = message.id.as_ref() {
        let retrieved = client.get_message(message_id).await?;
        tracing::info!(?retrieved, "retrieved message");
    }

    client.delete_contact(&contact_id).await?;
    tracing::info!(%contact_id, "deleted contact");

    match client.get_contact(&contact_id).await {
        Err(MessagingError::NotFound { message }) => {
            tracing::info!(%message, "deleted contact is gone");
        }
        Ok(contact) => tracing::warn!(?contact, "contact still present after delete"),
        Err(err) => return Err(err.into()),
    }

    Ok(())
}
