use async_trait::async_trait;
use lettre::{
    message::{Mailbox, SinglePart},
    transport::smtp::authentication::Credentials,
    Message, SmtpTransport, Transport,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::{sync::mpsc, task::JoinHandle};
use uuid::Uuid;

use crate::configuration::NotificationSettings;
use crate::error::StoreError;
use crate::models::{Film, SubscriptionType};
use crate::store::{SubscriptionRepository, UserRepository};

pub const NOTIFICATION_SUBJECT: &str = "New Film Notification";

/// Change feed of the film catalog.
#[derive(Debug, Clone)]
pub enum FilmEvent {
    Inserted(Film),
}

#[derive(Clone)]
pub struct FilmEvents {
    sender: mpsc::Sender<FilmEvent>,
}

impl FilmEvents {
    pub fn channel(capacity: usize) -> (FilmEvents, mpsc::Receiver<FilmEvent>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (FilmEvents { sender }, receiver)
    }

    /// Never fails the caller; a closed or full channel only loses the event.
    pub fn publish(&self, event: FilmEvent) {
        if let Err(err) = self.sender.try_send(event) {
            tracing::error!("Dropping film event: {}", err);
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum NotifyError {
    #[error("recipient {0} has no known address")]
    UnknownRecipient(String),
    #[error("failed to build message: {0}")]
    Message(String),
    #[error("failed to deliver message: {0}")]
    Transport(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Delivery of a message to one subscriber.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, user_id: &str, subject: &str, message: &str) -> Result<(), NotifyError>;
}

/// Logs notifications instead of sending them.
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn notify(&self, user_id: &str, subject: &str, message: &str) -> Result<(), NotifyError> {
        tracing::info!(%user_id, %subject, %message, "Notification");
        Ok(())
    }
}

pub struct EmailNotifier {
    users: Arc<dyn UserRepository>,
    relay: String,
    sender: String,
    sender_password: String,
}

impl EmailNotifier {
    pub fn new(settings: &NotificationSettings, users: Arc<dyn UserRepository>) -> Self {
        EmailNotifier {
            users,
            relay: settings.smtp_relay.clone(),
            sender: settings.sender.clone(),
            sender_password: settings.sender_password.clone(),
        }
    }

    async fn address_of(&self, user_id: &str) -> Result<String, NotifyError> {
        let user = match Uuid::parse_str(user_id) {
            Ok(id) => self.users.find_by_id(id).await?,
            Err(_) => self.users.find_by_username(user_id).await?,
        };
        user.map(|user| user.email)
            .ok_or_else(|| NotifyError::UnknownRecipient(user_id.to_string()))
    }
}

fn send_email(
    relay: &str,
    sender: &str,
    sender_password: &str,
    email: &str,
    subject: &str,
    content: String,
) -> Result<(), NotifyError> {
    let email_body = Message::builder()
        .from(
            sender
                .parse::<Mailbox>()
                .map_err(|err| NotifyError::Message(err.to_string()))?,
        )
        .to(email
            .parse::<Mailbox>()
            .map_err(|err| NotifyError::Message(err.to_string()))?)
        .subject(subject)
        .singlepart(SinglePart::plain(content))
        .map_err(|err| NotifyError::Message(err.to_string()))?;

    let creds = Credentials::new(sender.to_string(), sender_password.to_string());
    let mailer = SmtpTransport::relay(relay)
        .map_err(|err| NotifyError::Transport(err.to_string()))?
        .credentials(creds)
        .build();

    match mailer.send(&email_body) {
        Ok(_) => {
            tracing::info!("Email sent to {} successfully!", email);
            Ok(())
        }
        Err(err) => {
            tracing::error!("Failed to send email {:#?}", err);
            Err(NotifyError::Transport(err.to_string()))
        }
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn notify(&self, user_id: &str, subject: &str, message: &str) -> Result<(), NotifyError> {
        let email = self.address_of(user_id).await?;
        let relay = self.relay.clone();
        let sender = self.sender.clone();
        let sender_password = self.sender_password.clone();
        let subject = subject.to_string();
        let content = message.to_string();
        tokio::task::spawn_blocking(move || {
            send_email(&relay, &sender, &sender_password, &email, &subject, content)
        })
        .await
        .map_err(|err| NotifyError::Transport(err.to_string()))?
    }
}

/// Fans a new film out to everyone subscribed to its director, one of its
/// actors or its genre. Each subscriber is notified once.
pub struct NotificationDispatcher {
    subscriptions: Arc<dyn SubscriptionRepository>,
    notifier: Arc<dyn Notifier>,
}

impl NotificationDispatcher {
    pub fn new(subscriptions: Arc<dyn SubscriptionRepository>, notifier: Arc<dyn Notifier>) -> Self {
        NotificationDispatcher {
            subscriptions,
            notifier,
        }
    }

    pub async fn subscribers_of(&self, film: &Film) -> Result<BTreeSet<String>, StoreError> {
        let mut subscribers = BTreeSet::new();
        subscribers.extend(
            self.subscriptions
                .subscribers(SubscriptionType::Director, &film.director)
                .await?,
        );
        for actor in &film.actors {
            subscribers.extend(
                self.subscriptions
                    .subscribers(SubscriptionType::Actor, actor)
                    .await?,
            );
        }
        subscribers.extend(
            self.subscriptions
                .subscribers(SubscriptionType::Genre, &film.genre)
                .await?,
        );
        Ok(subscribers)
    }

    /// Returns how many subscribers were notified successfully.
    pub async fn dispatch(&self, event: &FilmEvent) -> Result<usize, StoreError> {
        match event {
            FilmEvent::Inserted(film) => {
                let message = format!("New film added: {}", film.title);
                let mut delivered = 0;
                for subscriber in self.subscribers_of(film).await? {
                    match self
                        .notifier
                        .notify(&subscriber, NOTIFICATION_SUBJECT, &message)
                        .await
                    {
                        Ok(()) => delivered += 1,
                        Err(err) => {
                            tracing::error!(%subscriber, film_id = %film.film_id, "Notification failed: {}", err)
                        }
                    }
                }
                Ok(delivered)
            }
        }
    }
}

pub fn spawn_notification_worker(
    dispatcher: NotificationDispatcher,
    mut events: mpsc::Receiver<FilmEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match dispatcher.dispatch(&event).await {
                Ok(count) => tracing::info!("Notified {} subscribers", count),
                Err(err) => tracing::error!("Failed to collect subscribers: {}", err),
            }
        }
        tracing::info!("Film event channel closed, notification worker stopping");
    })
}
