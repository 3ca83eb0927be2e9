use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tracing::debug;

use super::action::{Action, Documents};
use crate::loader::{fetch_page, LoadTicket};
use crate::matchups::tool::fetch_ticket;
use crate::matchups::RenderTicket;
use crate::session::Session;

/// Side effects returned by the reducer
pub enum Effect {
    None,
    Action(Action),
    Async(Pin<Box<dyn Future<Output = Action> + Send>>),
}

impl std::fmt::Debug for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Effect::None => write!(f, "None"),
            Effect::Action(action) => write!(f, "Action({:?})", action),
            Effect::Async(_) => write!(f, "Async(..)"),
        }
    }
}

/// Effect handler for site I/O
///
/// Each method returns an Effect that dispatches the matching completion
/// action when done.
pub struct DataEffects {
    session: Arc<Session>,
}

impl DataEffects {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Load the navigation manifest, the matchup index and the dropdown sources
    pub fn load_documents(&self) -> Effect {
        let session = self.session.clone();
        Effect::Async(Box::pin(async move {
            let (nav, index, options) = tokio::join!(session.nav(), session.index(), session.options());
            Action::DocumentsLoaded(Documents { nav, index, options })
        }))
    }

    pub fn load_page(&self, ticket: LoadTicket) -> Effect {
        let session = self.session.clone();
        Effect::Async(Box::pin(async move {
            debug!("EFFECT: loading {} (generation {})", ticket.target.file, ticket.generation);
            let page = fetch_page(&session, &ticket.target).await;
            Action::PageLoaded {
                generation: ticket.generation,
                page: page.map(Box::new),
                cache: session.cache().stats().await,
            }
        }))
    }

    /// Warm the cache with the pages after `page_id`
    pub fn prefetch(&self, page_id: String) -> Effect {
        let session = self.session.clone();
        Effect::Async(Box::pin(async move {
            session.prefetch_siblings(&page_id).await;
            Action::Prefetched(page_id)
        }))
    }

    pub fn render_matchups(&self, ticket: RenderTicket) -> Effect {
        let session = self.session.clone();
        Effect::Async(Box::pin(async move {
            let rendered = fetch_ticket(session.cache(), &ticket).await;
            Action::MatchupsRendered {
                generation: ticket.generation,
                rendered,
            }
        }))
    }
}
