mod booking_api;
mod helpers;
mod location_api;
mod retry;
mod route_api;
mod search_api;

pub use retry::RetryPolicy;

use async_channel::{Receiver, Sender};
use async_trait::async_trait;
use tokio::sync::{oneshot, watch};

use crate::{
    api::{Providers, SessionAPI},
    entities::{Authorization, Booking, Coordinate, Directions, Place, Placemark, Session},
    error::{unexpected_error, Error},
};

type Ack = oneshot::Sender<Result<(), Error>>;
type BookingReply = oneshot::Sender<Result<Booking, Error>>;

#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Value of the `name` field written on every booking document.
    pub app_name: String,
    pub retry: RetryPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            app_name: "UberClone".into(),
            retry: RetryPolicy::default(),
        }
    }
}

/// Intents sent by the view layer.
#[derive(Debug)]
enum Intent {
    Start,
    AuthorizationChanged(Authorization),
    RefreshLocation,
    DismissAlert,
    SetSource(Coordinate),
    SetDestination(Coordinate, Option<String>),
    ClearDestination,
    OpenSearch,
    CloseSearch,
    SetQuery(String),
    SelectCandidate(usize),
    Retry,
}

/// Messages into the session task.
#[derive(Debug)]
enum Command {
    Intent(Intent, Ack),
    Confirm(BookingReply),
    Cancel(String, Ack),
    AuthorizationResolved(Authorization),
    FixResolved(Result<Coordinate, Error>),
    RouteResolved {
        request_id: u64,
        result: Result<Directions, Error>,
    },
    PlaceNameResolved {
        request_id: u64,
        result: Result<Placemark, Error>,
    },
    SearchResolved {
        request_id: u64,
        result: Result<Vec<Place>, Error>,
    },
    BookingPersisted {
        booking_id: String,
        result: Result<String, Error>,
        reply: Option<BookingReply>,
    },
    BookingDeleted {
        booking_id: String,
        result: Result<(), Error>,
        reply: Option<Ack>,
    },
}

/// Reply held back until the new snapshot is published.
enum Reply {
    None,
    Ack(Ack, Result<(), Error>),
    Booking(BookingReply, Result<Booking, Error>),
}

impl Reply {
    fn send(self) {
        let delivered = match self {
            Reply::None => true,
            Reply::Ack(ack, result) => ack.send(result).is_ok(),
            Reply::Booking(reply, result) => reply.send(result).is_ok(),
        };

        if !delivered {
            tracing::debug!("caller went away before the reply was sent");
        }
    }
}

/// Handle to a session owned by a dedicated task.
///
/// Every mutation of the session, including map overlay changes, happens on
/// that task in the order commands arrive, so completions can never interleave.
pub struct Engine {
    intents: Sender<Command>,
    snapshots: watch::Receiver<Session>,
}

impl Engine {
    #[tracing::instrument(name = "Engine::new", skip_all)]
    pub fn new(providers: Providers, config: SessionConfig) -> Self {
        let (intents, intents_rx) = async_channel::unbounded();
        let (completions, completions_rx) = async_channel::unbounded();
        let (publisher, snapshots) = watch::channel(Session::default());

        let owner = Owner {
            session: Session::default(),
            providers,
            config,
            completions,
            publisher,
        };

        tokio::spawn(owner.run(intents_rx, completions_rx));

        Self { intents, snapshots }
    }

    async fn intent(&self, intent: Intent) -> Result<(), Error> {
        let (ack, response) = oneshot::channel();

        self.intents
            .send(Command::Intent(intent, ack))
            .await
            .map_err(|_| unexpected_error())?;

        response.await.map_err(|_| unexpected_error())?
    }
}

#[async_trait]
impl SessionAPI for Engine {
    fn snapshot(&self) -> Session {
        self.snapshots.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Session> {
        self.snapshots.clone()
    }

    async fn start(&self) -> Result<(), Error> {
        self.intent(Intent::Start).await
    }

    async fn authorization_changed(&self, authorization: Authorization) -> Result<(), Error> {
        self.intent(Intent::AuthorizationChanged(authorization)).await
    }

    async fn refresh_location(&self) -> Result<(), Error> {
        self.intent(Intent::RefreshLocation).await
    }

    async fn dismiss_alert(&self) -> Result<(), Error> {
        self.intent(Intent::DismissAlert).await
    }

    async fn set_source(&self, coordinate: Coordinate) -> Result<(), Error> {
        self.intent(Intent::SetSource(coordinate)).await
    }

    async fn set_destination(
        &self,
        coordinate: Coordinate,
        name: Option<String>,
    ) -> Result<(), Error> {
        self.intent(Intent::SetDestination(coordinate, name)).await
    }

    async fn tap_map(&self, coordinate: Coordinate) -> Result<(), Error> {
        self.intent(Intent::SetDestination(coordinate, None)).await
    }

    async fn clear_destination(&self) -> Result<(), Error> {
        self.intent(Intent::ClearDestination).await
    }

    async fn open_search(&self) -> Result<(), Error> {
        self.intent(Intent::OpenSearch).await
    }

    async fn close_search(&self) -> Result<(), Error> {
        self.intent(Intent::CloseSearch).await
    }

    async fn set_query(&self, query: String) -> Result<(), Error> {
        self.intent(Intent::SetQuery(query)).await
    }

    async fn select_candidate(&self, id: usize) -> Result<(), Error> {
        self.intent(Intent::SelectCandidate(id)).await
    }

    async fn confirm_booking(&self) -> Result<Booking, Error> {
        let (reply, response) = oneshot::channel();

        self.intents
            .send(Command::Confirm(reply))
            .await
            .map_err(|_| unexpected_error())?;

        response.await.map_err(|_| unexpected_error())?
    }

    async fn cancel_booking(&self, booking_id: String) -> Result<(), Error> {
        let (ack, response) = oneshot::channel();

        self.intents
            .send(Command::Cancel(booking_id, ack))
            .await
            .map_err(|_| unexpected_error())?;

        response.await.map_err(|_| unexpected_error())?
    }

    async fn retry(&self) -> Result<(), Error> {
        self.intent(Intent::Retry).await
    }
}

struct Owner {
    session: Session,
    providers: Providers,
    config: SessionConfig,
    completions: Sender<Command>,
    publisher: watch::Sender<Session>,
}

impl Owner {
    async fn run(mut self, intents: Receiver<Command>, completions: Receiver<Command>) {
        tracing::info!("session started");

        loop {
            let command = tokio::select! {
                intent = intents.recv() => match intent {
                    Ok(command) => command,
                    Err(_) => break,
                },
                completion = completions.recv() => match completion {
                    Ok(command) => command,
                    Err(_) => break,
                },
            };

            let reply = self.handle(command);

            self.session.sync_ui();
            self.publisher.send_replace(self.session.clone());

            reply.send();
        }

        tracing::info!("session closed");
    }

    fn handle(&mut self, command: Command) -> Reply {
        match command {
            Command::Intent(intent, ack) => Reply::Ack(ack, self.handle_intent(intent)),
            // both answer once the store call has completed
            Command::Confirm(reply) => match self.confirm(Some(reply)) {
                Ok(()) => Reply::None,
                Err((Some(reply), err)) => Reply::Booking(reply, Err(err)),
                Err((None, _)) => Reply::None,
            },
            Command::Cancel(booking_id, ack) => match self.cancel(booking_id, Some(ack)) {
                Ok(()) => Reply::None,
                Err((Some(ack), err)) => Reply::Ack(ack, Err(err)),
                Err((None, _)) => Reply::None,
            },
            Command::AuthorizationResolved(authorization) => {
                self.authorization_changed(authorization);
                Reply::None
            }
            Command::FixResolved(result) => {
                self.fix_resolved(result);
                Reply::None
            }
            Command::RouteResolved { request_id, result } => {
                self.route_resolved(request_id, result);
                Reply::None
            }
            Command::PlaceNameResolved { request_id, result } => {
                self.place_name_resolved(request_id, result);
                Reply::None
            }
            Command::SearchResolved { request_id, result } => {
                self.search_resolved(request_id, result);
                Reply::None
            }
            Command::BookingPersisted {
                booking_id,
                result,
                reply,
            } => {
                let outcome = self.booking_persisted(&booking_id, result);
                match reply {
                    Some(reply) => Reply::Booking(reply, outcome),
                    None => Reply::None,
                }
            }
            Command::BookingDeleted {
                booking_id,
                result,
                reply,
            } => {
                let outcome = self.booking_deleted(&booking_id, result);
                match reply {
                    Some(ack) => Reply::Ack(ack, outcome),
                    None => Reply::None,
                }
            }
        }
    }

    #[tracing::instrument(skip(self))]
    fn handle_intent(&mut self, intent: Intent) -> Result<(), Error> {
        match intent {
            Intent::Start => self.start(),
            Intent::AuthorizationChanged(authorization) => {
                self.authorization_changed(authorization);
            }
            Intent::RefreshLocation => self.refresh_location(),
            Intent::DismissAlert => self.session.location.dismiss_alert(),
            Intent::SetSource(coordinate) => self.set_source(coordinate.validate()?),
            Intent::SetDestination(coordinate, name) => {
                self.set_destination(coordinate.validate()?, name)
            }
            Intent::ClearDestination => self.clear_destination(),
            Intent::OpenSearch => self.session.open_search(),
            Intent::CloseSearch => self.session.close_search(),
            Intent::SetQuery(query) => self.set_query(query),
            Intent::SelectCandidate(id) => self.select_candidate(id)?,
            Intent::Retry => self.retry()?,
        }

        Ok(())
    }
}
