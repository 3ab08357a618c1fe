use actix_cors::Cors;
use actix_web::http::header;
use actix_web::{
    dev::Server,
    web::{self, Data},
    App, HttpServer,
};
use sqlx::PgPool;
use std::net::TcpListener;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

use crate::configuration::Settings;
use crate::routes::{
    auth_source, authorizer_source, feed_source, films_source, health_check, reviews_source,
    subscriptions_source, transcoding_source,
};
use crate::services::auth::TokenService;
use crate::services::notifications::{
    spawn_notification_worker, EmailNotifier, FilmEvents, NotificationDispatcher, Notifier,
    TracingNotifier,
};
use crate::services::transcoding::{
    spawn_transcode_worker, FfmpegEncoder, RetryConfig, TranscodeOrchestrator, TranscodeWorker,
    VideoEncoder,
};
use crate::store::{
    DownloadRepository, FeedRepository, FilmRepository, ObjectStore, PgDownloadRepository,
    PgFeedRepository, PgFilmRepository, PgReviewRepository, PgSubscriptionRepository,
    PgUserRepository, ReviewRepository, SubscriptionRepository, UserRepository,
};

/// Every external system the handlers and workers talk to.
#[derive(Clone)]
pub struct Backends {
    pub films: Arc<dyn FilmRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
    pub subscriptions: Arc<dyn SubscriptionRepository>,
    pub feed: Arc<dyn FeedRepository>,
    pub downloads: Arc<dyn DownloadRepository>,
    pub users: Arc<dyn UserRepository>,
    pub objects: Arc<dyn ObjectStore>,
    pub notifier: Arc<dyn Notifier>,
    pub encoder: Arc<dyn VideoEncoder>,
}

impl Backends {
    pub fn postgres(db_pool: PgPool, objects: Arc<dyn ObjectStore>, settings: &Settings) -> Self {
        let users: Arc<dyn UserRepository> = Arc::new(PgUserRepository::new(db_pool.clone()));
        let notifier: Arc<dyn Notifier> = if settings.notifications.enabled {
            Arc::new(EmailNotifier::new(&settings.notifications, users.clone()))
        } else {
            Arc::new(TracingNotifier)
        };
        Backends {
            films: Arc::new(PgFilmRepository::new(db_pool.clone())),
            reviews: Arc::new(PgReviewRepository::new(db_pool.clone())),
            subscriptions: Arc::new(PgSubscriptionRepository::new(db_pool.clone())),
            feed: Arc::new(PgFeedRepository::new(db_pool.clone())),
            downloads: Arc::new(PgDownloadRepository::new(db_pool)),
            users,
            objects,
            notifier,
            encoder: Arc::new(FfmpegEncoder::new(settings.transcoding.ffmpeg_path.clone())),
        }
    }
}

/// Film uploads travel inline as base64.
const MAX_JSON_PAYLOAD: usize = 256 * 1024 * 1024;

fn configure_cors(frontend_url: &str) -> Cors {
    let mut cors = Cors::default();
    cors = if frontend_url == "*" {
        cors.allow_any_origin()
    } else {
        cors.allowed_origin(frontend_url)
    };
    cors.allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE"])
        .allowed_headers(vec![header::AUTHORIZATION, header::ACCEPT])
        .allowed_header(header::CONTENT_TYPE)
        .max_age(3600)
}

/// Starts the notification and transcode workers and binds the HTTP server.
/// Must be called from within a tokio runtime.
pub fn run_server(
    listener: TcpListener,
    backends: Backends,
    settings: Settings,
) -> Result<Server, std::io::Error> {
    let tokens = Arc::new(TokenService::new(&settings.auth));

    let (film_events, event_receiver) =
        FilmEvents::channel(settings.notifications.channel_capacity.max(1));
    spawn_notification_worker(
        NotificationDispatcher::new(backends.subscriptions.clone(), backends.notifier.clone()),
        event_receiver,
    );

    let (transcoder, jobs) = TranscodeOrchestrator::new(&settings.transcoding);
    spawn_transcode_worker(
        transcoder.clone(),
        TranscodeWorker::new(
            backends.objects.clone(),
            backends.encoder.clone(),
            settings.transcoding.work_dir.clone(),
            RetryConfig::from_settings(&settings.transcoding),
        ),
        jobs,
    );

    let frontend_url = settings.application.frontend_url.clone();
    let films = Data::from(backends.films);
    let reviews = Data::from(backends.reviews);
    let subscriptions = Data::from(backends.subscriptions);
    let feed = Data::from(backends.feed);
    let downloads = Data::from(backends.downloads);
    let users = Data::from(backends.users);
    let objects = Data::from(backends.objects);
    let token_data = Data::from(tokens.clone());
    let film_events = Data::new(film_events);
    let transcoder = Data::new(transcoder);
    let settings = Data::new(settings);

    let server: Server = HttpServer::new(move || {
        let cors = configure_cors(frontend_url.as_str());
        App::new()
            .wrap(cors)
            .wrap(TracingLogger::default())
            .app_data(films.clone())
            .app_data(reviews.clone())
            .app_data(subscriptions.clone())
            .app_data(feed.clone())
            .app_data(downloads.clone())
            .app_data(users.clone())
            .app_data(objects.clone())
            .app_data(token_data.clone())
            .app_data(film_events.clone())
            .app_data(transcoder.clone())
            .app_data(settings.clone())
            .app_data(web::JsonConfig::default().limit(MAX_JSON_PAYLOAD))
            .route("/health", web::get().to(health_check))
            .service(auth_source(&tokens))
            .service(authorizer_source())
            .service(films_source(&tokens))
            .service(subscriptions_source(&tokens))
            .service(feed_source(&tokens))
            .service(reviews_source(&tokens))
            .service(transcoding_source(&tokens))
    })
    .listen(listener)?
    .run();

    Ok(server)
}
