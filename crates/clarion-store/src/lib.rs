//! Clarion Storage Layer
//!
//! Implements the `PropositionStore` and `AnalysisStore` traits on SQLite.
//!
//! # Architecture
//!
//! - Ids are stored as 16-byte big-endian UUID blobs
//! - Analyses are keyed by (revision_group, version) and replaced wholesale
//! - Question evidence and factor scores are stored as JSON text columns
//!
//! # Examples
//!
//! ```no_run
//! use clarion_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for proposition operations
//! ```

#![warn(missing_docs)]

use std::collections::BTreeMap;
use std::path::Path;

use clarion_domain::traits::{AnalysisStore, PropositionStore};
use clarion_domain::{
    ClarificationAnalysis, ClarifyingQuestion, EvidenceRef, GenerationMethod, Observation,
    ObservationId, Proposition, PropositionId, QuestionId, RevisionGroupId,
};
use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::InvalidData(format!("JSON error: {}", e))
    }
}

/// SQLite-based implementation of the proposition and analysis stores
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Each thread should have its own
/// SqliteStore instance, or access should be serialized by the caller.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use clarion_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("clarion.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let mut store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    fn id_to_bytes(value: u128) -> Vec<u8> {
        value.to_be_bytes().to_vec()
    }

    fn bytes_to_u128(bytes: &[u8]) -> Result<u128, StoreError> {
        if bytes.len() != 16 {
            return Err(StoreError::InvalidData(format!(
                "Expected 16 bytes for id, got {}",
                bytes.len()
            )));
        }
        let mut arr = [0u8; 16];
        arr.copy_from_slice(bytes);
        Ok(u128::from_be_bytes(arr))
    }

    fn conversion_err(
        idx: usize,
        e: StoreError,
    ) -> rusqlite::Error {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Blob, Box::new(e))
    }

    /// Insert a proposition version
    pub fn save_proposition(&mut self, proposition: &Proposition) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO propositions (id, text, reasoning, confidence, decay, revision_group, version, observation_count, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                Self::id_to_bytes(proposition.id.value()),
                &proposition.text,
                &proposition.reasoning,
                proposition.confidence,
                proposition.decay,
                Self::id_to_bytes(proposition.revision_group.value()),
                proposition.version,
                proposition.observation_count,
                proposition.created_at as i64,
                proposition.updated_at as i64,
            ],
        )?;
        Ok(())
    }

    /// Insert an observation
    pub fn add_observation(&mut self, observation: &Observation) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO observations (id, content, created_at) VALUES (?1, ?2, ?3)",
            params![
                Self::id_to_bytes(observation.id.value()),
                &observation.content,
                observation.created_at as i64,
            ],
        )?;
        Ok(())
    }

    /// Link an observation to a proposition version as supporting evidence
    ///
    /// Also bumps the proposition's stored observation count.
    pub fn link_observation(
        &mut self,
        proposition_id: PropositionId,
        observation_id: ObservationId,
    ) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT OR IGNORE INTO proposition_observations (proposition_id, observation_id)
             VALUES (?1, ?2)",
            params![
                Self::id_to_bytes(proposition_id.value()),
                Self::id_to_bytes(observation_id.value()),
            ],
        )?;
        tx.execute(
            "UPDATE propositions SET observation_count = (
                 SELECT COUNT(*) FROM proposition_observations WHERE proposition_id = ?1
             ) WHERE id = ?1",
            params![Self::id_to_bytes(proposition_id.value())],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Create and save the next version of an existing proposition
    ///
    /// Returns the new version. The original row stays behind as history.
    pub fn revise_proposition(
        &mut self,
        id: PropositionId,
        text: String,
        reasoning: Option<String>,
        now: u64,
    ) -> Result<Proposition, StoreError> {
        let prior = self
            .get_proposition(id)?
            .ok_or_else(|| StoreError::NotFound(format!("proposition {}", id)))?;
        let current = self
            .current_proposition(prior.revision_group)?
            .ok_or_else(|| StoreError::NotFound(format!("revision group {}", prior.revision_group)))?;

        let revised = current.revised(text, reasoning, now);
        self.save_proposition(&revised)?;
        Ok(revised)
    }

    /// Current proposition versions that have no analysis yet
    ///
    /// Used by the backfill command to find work.
    pub fn unanalyzed_propositions(&self) -> Result<Vec<Proposition>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT p.id, p.text, p.reasoning, p.confidence, p.decay, p.revision_group, p.version, p.observation_count, p.created_at, p.updated_at
             FROM propositions p
             WHERE p.version = (
                 SELECT MAX(version) FROM propositions WHERE revision_group = p.revision_group
             )
             AND NOT EXISTS (
                 SELECT 1 FROM analyses a
                 WHERE a.revision_group = p.revision_group AND a.version = p.version
             )
             ORDER BY p.created_at",
        )?;

        let propositions = stmt
            .query_map([], Self::row_to_proposition)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(propositions)
    }

    fn row_to_proposition(row: &rusqlite::Row<'_>) -> rusqlite::Result<Proposition> {
        let id_bytes: Vec<u8> = row.get(0)?;
        let group_bytes: Vec<u8> = row.get(5)?;
        let id = Self::bytes_to_u128(&id_bytes).map_err(|e| Self::conversion_err(0, e))?;
        let group = Self::bytes_to_u128(&group_bytes).map_err(|e| Self::conversion_err(5, e))?;

        Ok(Proposition {
            id: PropositionId::from_value(id),
            text: row.get(1)?,
            reasoning: row.get(2)?,
            confidence: row.get(3)?,
            decay: row.get(4)?,
            revision_group: RevisionGroupId::from_value(group),
            version: row.get(6)?,
            observation_count: row.get(7)?,
            created_at: row.get::<_, i64>(8)? as u64,
            updated_at: row.get::<_, i64>(9)? as u64,
        })
    }

    fn row_to_question(row: &rusqlite::Row<'_>) -> rusqlite::Result<ClarifyingQuestion> {
        let id_bytes: Vec<u8> = row.get(0)?;
        let prop_bytes: Vec<u8> = row.get(1)?;
        let id = Self::bytes_to_u128(&id_bytes).map_err(|e| Self::conversion_err(0, e))?;
        let prop = Self::bytes_to_u128(&prop_bytes).map_err(|e| Self::conversion_err(1, e))?;

        let evidence_json: String = row.get(7)?;
        let evidence =
            evidence_from_json(&evidence_json).map_err(|e| Self::conversion_err(7, e))?;

        let method_str: String = row.get(8)?;
        let generation_method = GenerationMethod::parse(&method_str).ok_or_else(|| {
            Self::conversion_err(
                8,
                StoreError::InvalidData(format!("Unknown generation method: {}", method_str)),
            )
        })?;

        Ok(ClarifyingQuestion {
            id: QuestionId::from_value(id),
            proposition_id: PropositionId::from_value(prop),
            factor_name: row.get(2)?,
            factor_id: row.get(3)?,
            factor_score: row.get(4)?,
            question: row.get(5)?,
            reasoning: row.get(6)?,
            evidence,
            generation_method,
            validation_passed: row.get(9)?,
            created_at: row.get::<_, i64>(10)? as u64,
        })
    }

    /// Resolve a proposition id to its revision group and current version
    fn current_version_of(
        &self,
        id: PropositionId,
    ) -> Result<Option<(RevisionGroupId, u32)>, StoreError> {
        let group: Option<Vec<u8>> = self
            .conn
            .query_row(
                "SELECT revision_group FROM propositions WHERE id = ?1",
                params![Self::id_to_bytes(id.value())],
                |row| row.get(0),
            )
            .optional()?;

        let Some(group_bytes) = group else {
            return Ok(None);
        };
        let group = RevisionGroupId::from_value(Self::bytes_to_u128(&group_bytes)?);

        let version: u32 = self.conn.query_row(
            "SELECT MAX(version) FROM propositions WHERE revision_group = ?1",
            params![Self::id_to_bytes(group.value())],
            |row| row.get(0),
        )?;

        Ok(Some((group, version)))
    }
}

fn evidence_to_json(evidence: &[EvidenceRef]) -> Result<String, StoreError> {
    let values: Vec<serde_json::Value> = evidence
        .iter()
        .map(|e| {
            serde_json::json!({
                "observation_id": e.observation_id.to_string(),
                "snippet": e.snippet,
            })
        })
        .collect();
    Ok(serde_json::to_string(&values)?)
}

fn evidence_from_json(json: &str) -> Result<Vec<EvidenceRef>, StoreError> {
    let values: Vec<serde_json::Value> = serde_json::from_str(json)?;
    values
        .iter()
        .map(|v| {
            let id = v
                .get("observation_id")
                .and_then(|v| v.as_str())
                .ok_or_else(|| StoreError::InvalidData("Missing observation_id".to_string()))?;
            let snippet = v
                .get("snippet")
                .and_then(|v| v.as_str())
                .ok_or_else(|| StoreError::InvalidData("Missing snippet".to_string()))?;
            Ok(EvidenceRef {
                observation_id: ObservationId::from_string(id).map_err(StoreError::InvalidData)?,
                snippet: snippet.to_string(),
            })
        })
        .collect()
}

impl PropositionStore for SqliteStore {
    type Error = StoreError;

    fn get_proposition(&self, id: PropositionId) -> Result<Option<Proposition>, Self::Error> {
        let proposition = self
            .conn
            .query_row(
                "SELECT id, text, reasoning, confidence, decay, revision_group, version, observation_count, created_at, updated_at
                 FROM propositions WHERE id = ?1",
                params![Self::id_to_bytes(id.value())],
                Self::row_to_proposition,
            )
            .optional()?;
        Ok(proposition)
    }

    fn current_proposition(
        &self,
        group: RevisionGroupId,
    ) -> Result<Option<Proposition>, Self::Error> {
        let proposition = self
            .conn
            .query_row(
                "SELECT id, text, reasoning, confidence, decay, revision_group, version, observation_count, created_at, updated_at
                 FROM propositions WHERE revision_group = ?1
                 ORDER BY version DESC LIMIT 1",
                params![Self::id_to_bytes(group.value())],
                Self::row_to_proposition,
            )
            .optional()?;
        Ok(proposition)
    }

    fn revision_history(&self, group: RevisionGroupId) -> Result<Vec<Proposition>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, text, reasoning, confidence, decay, revision_group, version, observation_count, created_at, updated_at
             FROM propositions WHERE revision_group = ?1
             ORDER BY version ASC",
        )?;

        let propositions = stmt
            .query_map(
                params![Self::id_to_bytes(group.value())],
                Self::row_to_proposition,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(propositions)
    }

    fn observations_for(&self, id: PropositionId) -> Result<Vec<Observation>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT o.id, o.content, o.created_at
             FROM observations o
             JOIN proposition_observations po ON po.observation_id = o.id
             WHERE po.proposition_id = ?1
             ORDER BY o.created_at DESC",
        )?;

        let observations = stmt
            .query_map(params![Self::id_to_bytes(id.value())], |row| {
                let id_bytes: Vec<u8> = row.get(0)?;
                let obs_id =
                    Self::bytes_to_u128(&id_bytes).map_err(|e| Self::conversion_err(0, e))?;
                Ok(Observation {
                    id: ObservationId::from_value(obs_id),
                    content: row.get(1)?,
                    created_at: row.get::<_, i64>(2)? as u64,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(observations)
    }
}

impl AnalysisStore for SqliteStore {
    type Error = StoreError;

    fn replace_analysis(
        &mut self,
        analysis: &ClarificationAnalysis,
        questions: &[ClarifyingQuestion],
    ) -> Result<(), Self::Error> {
        let group_bytes = Self::id_to_bytes(analysis.revision_group.value());
        let triggered = serde_json::to_string(&analysis.triggered_factors)?;
        let scores = serde_json::to_string(&analysis.factor_scores)?;

        let question_rows: Vec<(Vec<u8>, Vec<u8>, String)> = questions
            .iter()
            .map(|q| {
                Ok((
                    Self::id_to_bytes(q.id.value()),
                    Self::id_to_bytes(q.proposition_id.value()),
                    evidence_to_json(&q.evidence)?,
                ))
            })
            .collect::<Result<Vec<_>, StoreError>>()?;

        let tx = self.conn.transaction()?;

        tx.execute(
            "DELETE FROM questions WHERE revision_group = ?1 AND version = ?2",
            params![&group_bytes, analysis.version],
        )?;
        tx.execute(
            "DELETE FROM analyses WHERE revision_group = ?1 AND version = ?2",
            params![&group_bytes, analysis.version],
        )?;

        tx.execute(
            "INSERT INTO analyses (revision_group, version, proposition_id, needs_clarification, clarification_score, triggered_factors, reasoning, factor_scores, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                &group_bytes,
                analysis.version,
                Self::id_to_bytes(analysis.proposition_id.value()),
                analysis.needs_clarification,
                analysis.clarification_score,
                &triggered,
                &analysis.reasoning,
                &scores,
                analysis.created_at as i64,
            ],
        )?;

        for (seq, (question, (id_bytes, prop_bytes, evidence))) in
            questions.iter().zip(question_rows.iter()).enumerate()
        {
            tx.execute(
                "INSERT INTO questions (id, proposition_id, revision_group, version, seq, factor_name, factor_id, factor_score, question, reasoning, evidence, generation_method, validation_passed, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
                params![
                    id_bytes,
                    prop_bytes,
                    &group_bytes,
                    analysis.version,
                    seq as i64,
                    &question.factor_name,
                    question.factor_id,
                    question.factor_score,
                    &question.question,
                    &question.reasoning,
                    evidence,
                    question.generation_method.as_str(),
                    question.validation_passed,
                    question.created_at as i64,
                ],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    fn analysis_for(
        &self,
        id: PropositionId,
    ) -> Result<Option<ClarificationAnalysis>, Self::Error> {
        let Some((group, version)) = self.current_version_of(id)? else {
            return Ok(None);
        };

        let analysis = self
            .conn
            .query_row(
                "SELECT proposition_id, needs_clarification, clarification_score, triggered_factors, reasoning, factor_scores, created_at
                 FROM analyses WHERE revision_group = ?1 AND version = ?2",
                params![Self::id_to_bytes(group.value()), version],
                |row| {
                    let prop_bytes: Vec<u8> = row.get(0)?;
                    let prop = Self::bytes_to_u128(&prop_bytes)
                        .map_err(|e| Self::conversion_err(0, e))?;

                    let triggered_json: String = row.get(3)?;
                    let triggered: Vec<String> = serde_json::from_str(&triggered_json)
                        .map_err(|e| Self::conversion_err(3, e.into()))?;

                    let scores_json: String = row.get(5)?;
                    let factor_scores: BTreeMap<String, f64> =
                        serde_json::from_str(&scores_json)
                            .map_err(|e| Self::conversion_err(5, e.into()))?;

                    Ok(ClarificationAnalysis {
                        proposition_id: PropositionId::from_value(prop),
                        revision_group: group,
                        version,
                        needs_clarification: row.get(1)?,
                        clarification_score: row.get(2)?,
                        triggered_factors: triggered,
                        reasoning: row.get(4)?,
                        factor_scores,
                        created_at: row.get::<_, i64>(6)? as u64,
                    })
                },
            )
            .optional()?;
        Ok(analysis)
    }

    fn questions_for(&self, id: PropositionId) -> Result<Vec<ClarifyingQuestion>, Self::Error> {
        let Some((group, version)) = self.current_version_of(id)? else {
            return Ok(Vec::new());
        };

        let mut stmt = self.conn.prepare(
            "SELECT id, proposition_id, factor_name, factor_id, factor_score, question, reasoning, evidence, generation_method, validation_passed, created_at
             FROM questions WHERE revision_group = ?1 AND version = ?2
             ORDER BY seq ASC",
        )?;

        let questions = stmt
            .query_map(
                params![Self::id_to_bytes(group.value()), version],
                Self::row_to_question,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(questions)
    }
}
