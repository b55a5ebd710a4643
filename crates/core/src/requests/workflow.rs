//! Friend request workflow.
//!
//! A non-admin asks for new media; the request is rate limited, checked
//! against the library only (streaming or tracker hits are beside the
//! point when the goal is acquisition), then forwarded to the admin for
//! an approve/approve-4K/decline decision. The decision can arrive after
//! an arbitrary delay; the token on the buttons carries all state.

use std::sync::Arc;

use tracing::{info, warn};

use crate::acquire::AcquisitionTrigger;
use crate::config::Config;
use crate::media::{AcquisitionOutcome, Availability, MediaKind, MediaQuery, QualityTier};
use crate::metrics;
use crate::notify::{ApprovalButton, ApprovalPrompt, Notifier};
use crate::providers::{poster_url, CatalogEntry, CatalogService};
use crate::requests::{ApprovalAction, ApprovalToken, RateLimitLedger};
use crate::resolver::AvailabilityResolver;
use crate::texts::{self, Lang};

/// Cap on the overview text forwarded to the admin.
const OVERVIEW_LIMIT: usize = 400;

/// Terminal outcome of receiving a friend request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestReception {
    /// Daily quota exhausted; nothing else was checked.
    RateLimited,
    /// No catalog configured to resolve the query.
    CatalogNotConfigured,
    /// The catalog lookup failed.
    SearchFailed,
    /// The query matched nothing. No quota slot consumed.
    NoResults,
    /// Already served by the library. No quota slot consumed.
    AlreadyInLibrary { title: String, server_name: String },
    /// No admin identity in the configuration.
    AdminNotConfigured,
    /// The approval prompt could not be delivered.
    ForwardFailed,
    /// Forwarded to the admin for a decision.
    Forwarded { title: String },
}

impl RequestReception {
    fn label(&self) -> &'static str {
        match self {
            RequestReception::RateLimited => "rate_limited",
            RequestReception::CatalogNotConfigured => "catalog_not_configured",
            RequestReception::SearchFailed => "search_failed",
            RequestReception::NoResults => "no_results",
            RequestReception::AlreadyInLibrary { .. } => "already_in_library",
            RequestReception::AdminNotConfigured => "admin_not_configured",
            RequestReception::ForwardFailed => "forward_failed",
            RequestReception::Forwarded { .. } => "forwarded",
        }
    }
}

/// Outcome of an admin decision.
#[derive(Debug, Clone, PartialEq)]
pub enum DecisionOutcome {
    Declined { title: String },
    Approved {
        title: String,
        outcome: AcquisitionOutcome,
    },
    /// The catalog entry could not be re-fetched.
    DetailsUnavailable,
}

/// Drives a friend request from reception to the admin's decision.
pub struct FriendRequestWorkflow {
    catalog: Option<Arc<dyn CatalogService>>,
    resolver: Arc<AvailabilityResolver>,
    trigger: Arc<AcquisitionTrigger>,
    ledger: Arc<RateLimitLedger>,
    notifier: Arc<dyn Notifier>,
    admin_chat_id: Option<i64>,
    lang: Lang,
}

impl FriendRequestWorkflow {
    pub fn new(
        catalog: Option<Arc<dyn CatalogService>>,
        resolver: Arc<AvailabilityResolver>,
        trigger: Arc<AcquisitionTrigger>,
        ledger: Arc<RateLimitLedger>,
        notifier: Arc<dyn Notifier>,
        config: &Config,
    ) -> Self {
        Self {
            catalog,
            resolver,
            trigger,
            ledger,
            notifier,
            admin_chat_id: config.admin_user_id,
            lang: config.language,
        }
    }

    /// Receive a friend's free-text request.
    ///
    /// The quota slot is consumed only after the free checks pass: a
    /// rate-limited, unmatched or already-in-library request never counts
    /// against the requester.
    pub async fn handle_request(
        &self,
        requester_id: i64,
        requester_name: &str,
        kind: MediaKind,
        query_text: &str,
    ) -> RequestReception {
        let reception = self
            .receive(requester_id, requester_name, kind, query_text)
            .await;
        metrics::FRIEND_REQUESTS
            .with_label_values(&[reception.label()])
            .inc();
        reception
    }

    async fn receive(
        &self,
        requester_id: i64,
        requester_name: &str,
        kind: MediaKind,
        query_text: &str,
    ) -> RequestReception {
        // Cheapest rejection first: no catalog call for a throttled user.
        if !self.ledger.check(requester_id) {
            info!(requester_id, "friend request rate limited");
            return RequestReception::RateLimited;
        }

        let Some(catalog) = self.catalog.as_ref() else {
            return RequestReception::CatalogNotConfigured;
        };

        let results = match catalog.search(query_text, kind).await {
            Ok(results) => results,
            Err(e) => {
                warn!(error = %e, query_text, "friend request search failed");
                return RequestReception::SearchFailed;
            }
        };

        // The first result is authoritative; there is no disambiguation
        // step in this path.
        let Some(entry) = results.into_iter().next() else {
            return RequestReception::NoResults;
        };

        let query = MediaQuery {
            title: entry.title.clone(),
            year: entry.year,
            catalog_id: entry.id,
            kind,
        };

        if let Availability::FoundInLibrary { server_name } =
            self.resolver.check_library_only(&query).await
        {
            return RequestReception::AlreadyInLibrary {
                title: query.title,
                server_name,
            };
        }

        let Some(admin_chat_id) = self.admin_chat_id else {
            return RequestReception::AdminNotConfigured;
        };

        // The request is confirmed non-trivial; it costs a slot now.
        self.ledger.record(requester_id);

        let prompt = self.build_prompt(requester_id, requester_name, &entry, kind);
        if let Err(e) = self.notifier.send_prompt(admin_chat_id, &prompt).await {
            warn!(error = %e, requester_id, "could not forward request to admin");
            return RequestReception::ForwardFailed;
        }

        info!(requester_id, title = %query.title, "friend request forwarded to admin");
        RequestReception::Forwarded { title: query.title }
    }

    fn build_prompt(
        &self,
        requester_id: i64,
        requester_name: &str,
        entry: &CatalogEntry,
        kind: MediaKind,
    ) -> ApprovalPrompt {
        let year = entry
            .year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "N/A".to_string());
        let overview: String = entry
            .overview
            .as_deref()
            .unwrap_or("No overview available.")
            .chars()
            .take(OVERVIEW_LIMIT)
            .collect();
        let caption = format!(
            "📩 New media request from {requester_name}\n\n{} ({year})\n\n{overview}",
            entry.title
        );

        let token = |action: ApprovalAction| {
            ApprovalToken {
                action,
                kind,
                catalog_id: entry.id,
                requester: requester_id,
            }
            .encode()
        };

        ApprovalPrompt {
            caption,
            poster_url: entry.poster_path.as_deref().map(poster_url),
            actions: vec![
                ApprovalButton {
                    label: "✅ Accept".to_string(),
                    token: token(ApprovalAction::Approve(QualityTier::Standard)),
                },
                ApprovalButton {
                    label: "✅ Accept 4K".to_string(),
                    token: token(ApprovalAction::Approve(QualityTier::UltraHd)),
                },
                ApprovalButton {
                    label: "❌ Decline".to_string(),
                    token: token(ApprovalAction::Decline),
                },
            ],
        }
    }

    /// Apply an admin decision.
    ///
    /// The original search result is not retained between steps, so the
    /// catalog entry is re-fetched by id before acting. The admin's
    /// message is rewritten with the outcome appended and the requester
    /// gets exactly one notification.
    pub async fn handle_decision(
        &self,
        token: &ApprovalToken,
        admin_chat_id: i64,
        admin_message_id: i32,
        admin_message_text: &str,
    ) -> DecisionOutcome {
        let entry = match self.fetch_entry(token).await {
            Some(entry) => entry,
            None => {
                self.rewrite_admin_message(
                    admin_chat_id,
                    admin_message_id,
                    admin_message_text,
                    "⚠️ Could not load the details for this request.",
                )
                .await;
                self.notify_requester(token.requester, texts::generic_failure(self.lang))
                    .await;
                return DecisionOutcome::DetailsUnavailable;
            }
        };

        match token.action {
            ApprovalAction::Decline => {
                self.rewrite_admin_message(
                    admin_chat_id,
                    admin_message_id,
                    admin_message_text,
                    "❌ Declined.",
                )
                .await;
                self.notify_requester(
                    token.requester,
                    &texts::request_declined(self.lang, &entry.title),
                )
                .await;
                info!(catalog_id = token.catalog_id, requester = token.requester, "request declined");
                DecisionOutcome::Declined { title: entry.title }
            }
            ApprovalAction::Approve(tier) => {
                let query = MediaQuery {
                    title: entry.title.clone(),
                    year: entry.year,
                    catalog_id: entry.id,
                    kind: token.kind,
                };
                let outcome = self.trigger.acquire(&query, tier).await;

                let summary = outcome_summary(&outcome, &entry.title, token.kind);
                self.rewrite_admin_message(
                    admin_chat_id,
                    admin_message_id,
                    admin_message_text,
                    &summary,
                )
                .await;

                let requester_text = match outcome {
                    AcquisitionOutcome::Submitted | AcquisitionOutcome::AlreadyPresent => {
                        texts::request_approved(self.lang, &entry.title)
                    }
                    _ => texts::request_approved_but_failed(self.lang, &entry.title),
                };
                self.notify_requester(token.requester, &requester_text).await;

                info!(
                    catalog_id = token.catalog_id,
                    requester = token.requester,
                    outcome = outcome.label(),
                    "request approved"
                );
                DecisionOutcome::Approved {
                    title: entry.title,
                    outcome,
                }
            }
        }
    }

    async fn fetch_entry(&self, token: &ApprovalToken) -> Option<CatalogEntry> {
        let catalog = self.catalog.as_ref()?;
        match catalog.entry(token.catalog_id, token.kind).await {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, catalog_id = token.catalog_id, "could not re-fetch catalog entry");
                None
            }
        }
    }

    async fn rewrite_admin_message(
        &self,
        chat_id: i64,
        message_id: i32,
        current_text: &str,
        appendix: &str,
    ) {
        let updated = format!("{current_text}\n\n{appendix}");
        if let Err(e) = self
            .notifier
            .rewrite_message(chat_id, message_id, &updated)
            .await
        {
            warn!(error = %e, chat_id, message_id, "could not update admin message");
        }
    }

    async fn notify_requester(&self, requester: i64, text: &str) {
        if let Err(e) = self.notifier.send_text(requester, text).await {
            warn!(error = %e, requester, "could not notify requester");
        }
    }
}

/// Admin-facing summary line for an acquisition outcome.
fn outcome_summary(outcome: &AcquisitionOutcome, title: &str, kind: MediaKind) -> String {
    let service = match kind {
        MediaKind::Movie => "Radarr",
        MediaKind::Show => "Sonarr",
    };
    match outcome {
        AcquisitionOutcome::Submitted => texts::added_and_searching(Lang::En, title, service),
        AcquisitionOutcome::AlreadyPresent => texts::already_in_service(Lang::En, title, service),
        AcquisitionOutcome::MissingCrossReference => {
            texts::missing_cross_reference(Lang::En, title)
        }
        AcquisitionOutcome::Failed { reason } => {
            format!("{} ({reason})", texts::add_failed(Lang::En, title, service))
        }
        AcquisitionOutcome::NotConfigured { detail } => format!("⚠️ {detail}"),
    }
}
