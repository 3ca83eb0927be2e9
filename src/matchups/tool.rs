use futures::future::join_all;
use tracing::debug;

use super::form::{FormStatus, MatchupForm, ResolvedRow};
use super::index::FragmentIndex;
use super::mode::MatchupMode;
use super::options::OptionsResolver;
use crate::cache::PageCache;
use crate::fragment::{Fragment, Script};

/// Work order for one render of the results container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTicket {
    pub generation: u64,
    pub rows: Vec<ResolvedRow>,
}

/// A fetched matchup fragment ready for the results container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMatchup {
    pub row: usize,
    pub path: String,
    pub fragment: Fragment,
}

/// Outcome of a form change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Update {
    /// The value was not accepted; nothing changed
    Rejected,
    /// Results were cleared and nothing is to be rendered
    Cleared,
    /// Results were cleared; render these rows under the ticket's generation
    Render(RenderTicket),
}

/// Matchup form plus its results container
///
/// Every accepted change clears the results and takes a new generation, so
/// a completion from an older selection can never land in the container.
#[derive(Debug, Clone)]
pub struct MatchupTool {
    form: MatchupForm,
    status: FormStatus,
    generation: u64,
    committed: bool,
    rendered: Vec<RenderedMatchup>,
}

impl MatchupTool {
    pub fn new(mode: MatchupMode, options: &OptionsResolver) -> Self {
        Self {
            form: MatchupForm::new(mode, options),
            status: FormStatus::Unselected,
            generation: 0,
            committed: false,
            rendered: Vec::new(),
        }
    }

    pub fn form(&self) -> &MatchupForm {
        &self.form
    }

    pub fn status(&self) -> FormStatus {
        self.status
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn rendered(&self) -> &[RenderedMatchup] {
        &self.rendered
    }

    pub fn set_mode(
        &mut self,
        mode: MatchupMode,
        options: &OptionsResolver,
        index: Option<&FragmentIndex>,
    ) -> Update {
        self.form.set_mode(mode, options);
        self.on_change(index)
    }

    pub fn set_year(&mut self, year: &str, options: &OptionsResolver, index: Option<&FragmentIndex>) -> Update {
        if !self.form.set_year(year, options) {
            return Update::Rejected;
        }
        self.on_change(index)
    }

    pub fn set_key(
        &mut self,
        row: usize,
        position: usize,
        value: Option<&str>,
        index: Option<&FragmentIndex>,
    ) -> Update {
        if !self.form.set_key(row, position, value) {
            return Update::Rejected;
        }
        self.on_change(index)
    }

    pub fn set_field(&mut self, field: usize, value: Option<&str>, index: Option<&FragmentIndex>) -> Update {
        if !self.form.set_value(field, value) {
            return Update::Rejected;
        }
        self.on_change(index)
    }

    fn on_change(&mut self, index: Option<&FragmentIndex>) -> Update {
        let evaluation = self.form.evaluate(index);
        self.generation += 1;
        self.committed = false;
        self.rendered.clear();
        self.status = evaluation.status;

        if evaluation.status == FormStatus::Resolved {
            Update::Render(RenderTicket {
                generation: self.generation,
                rows: evaluation.resolved,
            })
        } else {
            Update::Cleared
        }
    }

    /// Place fetched fragments in the container
    ///
    /// Returns the scripts to revive, in row then document order, the first
    /// time a current generation is committed; stale or repeated commits
    /// return None and change nothing.
    pub fn commit(&mut self, generation: u64, mut rendered: Vec<RenderedMatchup>) -> Option<Vec<Script>> {
        if generation != self.generation || self.committed {
            debug!(
                "MATCHUPS: dropping render for generation {} (current {}, committed {})",
                generation, self.generation, self.committed
            );
            return None;
        }
        rendered.sort_by_key(|r| r.row);
        let scripts = rendered
            .iter()
            .flat_map(|r| r.fragment.scripts.iter().cloned())
            .collect();
        self.rendered = rendered;
        self.committed = true;
        Some(scripts)
    }
}

/// Fetch every resolved row of a ticket concurrently; failed rows are skipped
pub async fn fetch_ticket(cache: &PageCache, ticket: &RenderTicket) -> Vec<RenderedMatchup> {
    let fetches = ticket.rows.iter().map(|row| async move {
        match cache.get_or_fetch(&row.path).await {
            Ok(text) => Some(RenderedMatchup {
                row: row.row,
                path: row.path.clone(),
                fragment: Fragment::parse(&text),
            }),
            Err(e) => {
                debug!("MATCHUPS: fragment {} unavailable: {}", row.path, e);
                None
            }
        }
    });
    join_all(fetches).await.into_iter().flatten().collect()
}
