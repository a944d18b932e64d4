//! The five-stage resolution state machine.

use daihyo_core::{AppConfig, InvoiceNumber, ResolutionResult, Route, ShopQuery};
use daihyo_oracle::contracts::{company, corp_representative, invoice, representative};
use daihyo_oracle::{OracleClient, OracleError};
use daihyo_registry::{RegistryClient, RegistryError};
use daihyo_search::{format_pages_block, PageDocument, PageFetcher, SearchClient, SearchError};
use thiserror::Error;

use crate::validator;

const DIRECT_REP_TOP_N: usize = 3;
const INVOICE_TOP_N: usize = 3;
const COMPANY_TOP_N: usize = 3;
const CORP_REP_TOP_N: usize = 5;

/// Errors from assembling a [`Resolver`] out of its clients.
///
/// Construction is the only fallible step; a built resolver's
/// [`Resolver::resolve`] always completes with a terminal record.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// The stages of one run, in fallback order.
#[derive(Debug)]
enum Stage {
    DirectRepresentative,
    InvoiceLookup,
    CompanyName,
    CorporateCheck { company: String },
    CorporateRepresentative { company: String },
}

/// What a stage hands the run loop: the next stage, or the terminal record.
enum Next {
    Continue(Stage),
    Done(ResolutionResult),
}

/// Evidence accumulated across stages.
///
/// An invoice number found in stage 2 stays in the record no matter which
/// later route terminates the run.
#[derive(Debug, Default)]
struct RunState {
    invoice_number: Option<InvoiceNumber>,
}

/// The resolution pipeline.
///
/// Owns one client per evidence source. Runs are stateless with respect to
/// each other; a single resolver can serve any number of sequential runs.
pub struct Resolver {
    search: SearchClient,
    fetcher: PageFetcher,
    oracle: OracleClient,
    registry: RegistryClient,
}

impl Resolver {
    #[must_use]
    pub fn new(
        search: SearchClient,
        fetcher: PageFetcher,
        oracle: OracleClient,
        registry: RegistryClient,
    ) -> Self {
        Self {
            search,
            fetcher,
            oracle,
            registry,
        }
    }

    /// Builds a resolver from configuration plus the caller's oracle API key
    /// and optional model override.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] if any underlying HTTP client cannot be
    /// constructed.
    pub fn from_app_config(
        config: &AppConfig,
        api_key: &str,
        model_override: Option<&str>,
    ) -> Result<Self, PipelineError> {
        let search =
            SearchClient::with_base_url(config.search_timeout_secs, &config.search_base_url)?;
        let fetcher = PageFetcher::new(
            config.fetch_timeout_secs,
            &config.fetch_user_agent,
            config.fetch_max_retries,
            config.fetch_backoff_base_ms,
        )?;
        let model = model_override.unwrap_or(&config.oracle_model);
        let oracle = OracleClient::with_base_url(
            api_key,
            model,
            config.oracle_timeout_secs,
            &config.oracle_base_url,
        )?;
        let registry =
            RegistryClient::with_base_url(config.registry_timeout_secs, &config.registry_base_url)?;
        Ok(Self::new(search, fetcher, oracle, registry))
    }

    /// Runs the full fallback sequence for one shop.
    ///
    /// Always returns a terminal record; internal failures only narrow the
    /// evidence and steer the route.
    pub async fn resolve(&self, query: &ShopQuery) -> ResolutionResult {
        let mut state = RunState::default();
        let mut stage = Stage::DirectRepresentative;

        loop {
            tracing::info!(shop = %query.name, stage = ?stage, "entering stage");
            let next = match stage {
                Stage::DirectRepresentative => self.direct_representative(query).await,
                Stage::InvoiceLookup => self.invoice_lookup(query, &mut state).await,
                Stage::CompanyName => self.company_name(query, &state).await,
                Stage::CorporateCheck { company } => {
                    Self::corporate_check(query, &state, company)
                }
                Stage::CorporateRepresentative { company } => {
                    self.corporate_representative(query, &state, company).await
                }
            };
            match next {
                Next::Continue(s) => stage = s,
                Next::Done(result) => {
                    tracing::info!(
                        shop = %result.shopname,
                        route = %result.route,
                        company = result.company_name.as_deref().unwrap_or("-"),
                        representative = result.representative.as_deref().unwrap_or("-"),
                        "resolution finished"
                    );
                    return result;
                }
            }
        }
    }

    /// Stage 1: search for the shop's representative directly.
    async fn direct_representative(&self, query: &ShopQuery) -> Next {
        let q = format!("{} {} 代表 オーナー 店主", query.name, query.address);
        let Some(pages) = self.gather(&q, DIRECT_REP_TOP_N).await else {
            return Next::Continue(Stage::InvoiceLookup);
        };

        let payload = representative::build_payload(query, &pages);
        let raw = match self.oracle.chat(representative::INSTRUCTION, &payload).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "representative extraction failed — falling through");
                return Next::Continue(Stage::InvoiceLookup);
            }
        };

        let Some(report) = representative::parse_report(&raw) else {
            tracing::warn!("representative reply did not match the contract — falling through");
            return Next::Continue(Stage::InvoiceLookup);
        };

        let Some(candidate) = validator::first_accepted(&report) else {
            return Next::Continue(Stage::InvoiceLookup);
        };

        tracing::info!(
            representative = %candidate.name,
            confidence = candidate.confidence,
            "direct representative accepted"
        );

        // Best-effort invoice lookup on the way out; it never gates the route.
        let invoice_number = self
            .invoice_search(query, candidate.company.as_deref())
            .await;

        Next::Done(ResolutionResult {
            shopname: query.name.clone(),
            shopaddress: query.address.clone(),
            company_name: candidate.company,
            representative: Some(candidate.name),
            representative_title: candidate.title,
            source_url: candidate.url,
            invoice_number,
            route: Route::ShopDirect,
        })
    }

    /// Stage 2: find an invoice number, then ask the registry who owns it.
    async fn invoice_lookup(&self, query: &ShopQuery, state: &mut RunState) -> Next {
        let Some(number) = self.invoice_search(query, None).await else {
            return Next::Continue(Stage::CompanyName);
        };
        tracing::info!(invoice_number = %number, "invoice number found");
        state.invoice_number = Some(number.clone());

        let record = match self.registry.lookup(number.as_str()).await {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(error = %e, "registry lookup failed — falling through");
                return Next::Continue(Stage::CompanyName);
            }
        };

        let Some(company) = record.company_name else {
            tracing::warn!(
                registration_number = %record.registration_number,
                "registry record carries no entity name — falling through"
            );
            return Next::Continue(Stage::CompanyName);
        };

        if let Some(representative) = record.representative {
            return Next::Done(ResolutionResult {
                shopname: query.name.clone(),
                shopaddress: query.address.clone(),
                company_name: Some(company),
                representative: Some(representative),
                representative_title: None,
                source_url: Some(record.source_url),
                invoice_number: state.invoice_number.clone(),
                route: Route::InvoiceOfficial,
            });
        }

        // Registry knows the company but not its representative: reuse the
        // corporate-representative search against the registered name.
        match self.corp_representative_search(&company).await {
            Some(representative) => Next::Done(ResolutionResult {
                shopname: query.name.clone(),
                shopaddress: query.address.clone(),
                company_name: Some(company),
                representative: Some(representative),
                representative_title: None,
                source_url: Some(record.source_url),
                invoice_number: state.invoice_number.clone(),
                route: Route::InvoiceCorpRepresentative,
            }),
            None => Next::Done(ResolutionResult {
                shopname: query.name.clone(),
                shopaddress: query.address.clone(),
                company_name: Some(company),
                representative: None,
                representative_title: None,
                source_url: Some(record.source_url),
                invoice_number: state.invoice_number.clone(),
                route: Route::InvoiceCorpOnly,
            }),
        }
    }

    /// Stage 3: resolve the operating company from the open web.
    async fn company_name(&self, query: &ShopQuery, state: &RunState) -> Next {
        let q = format!("{} {} 運営会社", query.name, query.address);
        let answer = match self.gather(&q, COMPANY_TOP_N).await {
            Some(pages) => {
                let block = format_pages_block(&pages);
                let instruction = company::build_instruction(query, &block);
                match self.oracle.chat(&instruction, &block).await {
                    Ok(raw) => company::parse_answer(&raw, &query.name),
                    Err(e) => {
                        tracing::warn!(error = %e, "company extraction failed");
                        company::CompanyAnswer::NoMatch
                    }
                }
            }
            None => company::CompanyAnswer::NoMatch,
        };

        match answer {
            company::CompanyAnswer::NoMatch => Next::Done(ResolutionResult {
                shopname: query.name.clone(),
                shopaddress: query.address.clone(),
                company_name: None,
                representative: None,
                representative_title: None,
                source_url: None,
                invoice_number: state.invoice_number.clone(),
                route: Route::NoInfo,
            }),
            company::CompanyAnswer::ShopItself => Next::Done(ResolutionResult {
                shopname: query.name.clone(),
                shopaddress: query.address.clone(),
                company_name: Some(query.name.clone()),
                representative: None,
                representative_title: None,
                source_url: None,
                invoice_number: state.invoice_number.clone(),
                route: Route::ShopnameOnly,
            }),
            company::CompanyAnswer::Operator(company) => {
                tracing::info!(company = %company, "operating company resolved");
                Next::Continue(Stage::CorporateCheck { company })
            }
        }
    }

    /// Stage 4: is the resolved company string a registered entity at all?
    fn corporate_check(query: &ShopQuery, state: &RunState, company: String) -> Next {
        if validator::is_corporate_name(&company) {
            Next::Continue(Stage::CorporateRepresentative { company })
        } else {
            tracing::info!(company = %company, "no legal-entity marker — treating as trade name");
            Next::Done(ResolutionResult {
                shopname: query.name.clone(),
                shopaddress: query.address.clone(),
                company_name: Some(company),
                representative: None,
                representative_title: None,
                source_url: None,
                invoice_number: state.invoice_number.clone(),
                route: Route::NonCorporateCompanyName,
            })
        }
    }

    /// Stage 5: find the company's current representative.
    async fn corporate_representative(
        &self,
        query: &ShopQuery,
        state: &RunState,
        company: String,
    ) -> Next {
        let representative = self.corp_representative_search(&company).await;
        let route = if representative.is_some() {
            Route::CorpRepresentative
        } else {
            Route::CorpWithoutRep
        };
        Next::Done(ResolutionResult {
            shopname: query.name.clone(),
            shopaddress: query.address.clone(),
            company_name: Some(company),
            representative,
            representative_title: None,
            source_url: None,
            invoice_number: state.invoice_number.clone(),
            route,
        })
    }

    /// Searches and fetches the evidence pages for one stage.
    ///
    /// `None` means no usable evidence: the search failed or every page was
    /// dropped. The caller falls through.
    async fn gather(&self, query: &str, top_n: usize) -> Option<Vec<PageDocument>> {
        let links = match self.search.search(query, top_n).await {
            Ok(links) => links,
            Err(e) => {
                tracing::warn!(error = %e, "link search failed — no evidence for this stage");
                return None;
            }
        };
        let pages = self.fetcher.fetch_pages(&links).await;
        if pages.is_empty() {
            tracing::warn!(query = %query, "no evidence pages could be fetched");
            return None;
        }
        Some(pages)
    }

    /// Invoice-number search, optionally hinted with a known company name.
    ///
    /// The hint joins the query only when it adds information (known and
    /// distinct from the shop name). Any failure is `None` — the invoice
    /// number is never load-bearing for a stage's control flow alone.
    async fn invoice_search(
        &self,
        query: &ShopQuery,
        company_hint: Option<&str>,
    ) -> Option<InvoiceNumber> {
        let mut parts: Vec<&str> = Vec::new();
        if let Some(company) = company_hint {
            if !company.is_empty() && company != query.name {
                parts.push(company);
            }
        }
        parts.extend([
            query.name.as_str(),
            query.address.as_str(),
            "適格請求書発行事業者",
            "インボイス",
            "登録番号",
        ]);
        let q = parts.join(" ");

        let pages = self.gather(&q, INVOICE_TOP_N).await?;
        let block = format_pages_block(&pages);
        let instruction = invoice::build_instruction(query, company_hint, &block);
        let raw = match self.oracle.chat(&instruction, "").await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "invoice extraction failed");
                return None;
            }
        };
        invoice::parse_number(&raw)
    }

    /// Corporate-representative search for one named company.
    ///
    /// Used from stage 5 and, with the registry's name, from stage 2.
    async fn corp_representative_search(&self, company: &str) -> Option<String> {
        let q = format!("{company} 代表取締役 OR 代表者 OR 代表社員 OR 代表理事 会社概要");
        let pages = self.gather(&q, CORP_REP_TOP_N).await?;
        let block = format_pages_block(&pages);
        let instruction = corp_representative::build_instruction(company, &block);
        let raw = match self.oracle.chat(&instruction, &block).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "corporate-representative extraction failed");
                return None;
            }
        };
        corp_representative::parse_name(&raw)
    }
}
