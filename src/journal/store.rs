use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info};

use super::entry::{DreamEntry, DreamUpdate};
use super::insights::JournalInsights;
use super::repository::DreamRepository;
use crate::analysis::{clamp_confidence, DreamAnalyzer};
use crate::error::StoreError;
use crate::session::CommittedTranscript;

/// The dream journal: analyzes transcripts and keeps the resulting entries
#[derive(Clone)]
pub struct DreamStore {
    repository: Arc<dyn DreamRepository>,
    analyzer: DreamAnalyzer,
}

impl DreamStore {
    pub fn new(repository: Arc<dyn DreamRepository>, analyzer: DreamAnalyzer) -> Self {
        Self {
            repository,
            analyzer,
        }
    }

    pub fn analyzer(&self) -> &DreamAnalyzer {
        &self.analyzer
    }

    /// Analyze a spoken transcript and save it as a new dream.
    ///
    /// Fails with [`StoreError::EmptyTranscript`] if the transcript is blank.
    /// Confidence is clamped to [0, 1].
    pub async fn add_dream_from_voice(
        &self,
        transcription: &str,
        confidence: f32,
        duration: u64,
    ) -> Result<DreamEntry, StoreError> {
        ensure_not_blank(transcription)?;
        let confidence = clamp_confidence(confidence);

        let analysis = self
            .analyzer
            .analyze_with_confidence(transcription, confidence);
        let entry = DreamEntry::new(
            format!("dream-{}", uuid::Uuid::new_v4()),
            transcription.to_string(),
            analysis,
            confidence,
            duration,
            Utc::now(),
        );

        self.repository.insert(entry.clone()).await?;

        info!(
            dream_id = %entry.id,
            "Dream saved: \"{}\" with {} dream signs and {} emotions",
            entry.title,
            entry.dream_signs.len(),
            entry.emotions.len()
        );

        Ok(entry)
    }

    /// Save the outcome of a completed recording session
    pub async fn save_session(
        &self,
        transcript: &CommittedTranscript,
    ) -> Result<DreamEntry, StoreError> {
        self.add_dream_from_voice(
            &transcript.text,
            transcript.confidence,
            transcript.duration_secs,
        )
        .await
    }

    pub async fn get_dream(&self, id: &str) -> Result<Option<DreamEntry>, StoreError> {
        Ok(self.repository.get(id).await?)
    }

    /// Apply an edit.
    ///
    /// A changed transcript re-derives every analysis field together; a
    /// title in the same update is applied afterwards.
    pub async fn update_dream(
        &self,
        id: &str,
        update: DreamUpdate,
    ) -> Result<DreamEntry, StoreError> {
        let mut entry = self
            .repository
            .get(id)
            .await?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        if let Some(transcription) = update.transcription {
            ensure_not_blank(&transcription)?;
            if transcription != entry.transcription {
                let analysis = self
                    .analyzer
                    .analyze_with_confidence(&transcription, entry.confidence);
                entry.transcription = transcription;
                entry.apply_analysis(analysis);
                debug!(dream_id = %id, "Transcript edited, analysis refreshed");
            }
        }

        if let Some(title) = update.title {
            entry.title = title;
        }

        if !self.repository.replace(entry.clone()).await? {
            return Err(StoreError::NotFound(id.to_string()));
        }

        info!(dream_id = %id, "Dream updated");
        Ok(entry)
    }

    /// Remove a dream; false if it did not exist
    pub async fn delete_dream(&self, id: &str) -> Result<bool, StoreError> {
        let deleted = self.repository.delete(id).await?;
        if deleted {
            info!(dream_id = %id, "Dream deleted");
        }
        Ok(deleted)
    }

    /// Every dream, newest first
    pub async fn dreams(&self) -> Result<Vec<DreamEntry>, StoreError> {
        Ok(self.repository.list().await?)
    }

    /// Dreams recorded within `[start, end]`
    pub async fn dreams_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<DreamEntry>, StoreError> {
        let dreams = self.repository.list().await?;
        Ok(dreams
            .into_iter()
            .filter(|d| d.recorded_at >= start && d.recorded_at <= end)
            .collect())
    }

    /// The `count` newest dreams
    pub async fn recent_dreams(&self, count: usize) -> Result<Vec<DreamEntry>, StoreError> {
        let mut dreams = self.repository.list().await?;
        dreams.truncate(count);
        Ok(dreams)
    }

    pub async fn total_dreams(&self) -> Result<usize, StoreError> {
        Ok(self.repository.list().await?.len())
    }

    /// Dreams carrying the tag, dream sign or emotion
    pub async fn dreams_by_tag(&self, tag: &str) -> Result<Vec<DreamEntry>, StoreError> {
        let dreams = self.repository.list().await?;
        Ok(dreams.into_iter().filter(|d| d.has_tag(tag)).collect())
    }

    pub async fn insights(&self) -> Result<JournalInsights, StoreError> {
        let dreams = self.repository.list().await?;
        Ok(JournalInsights::from_dreams(&dreams))
    }
}

fn ensure_not_blank(transcription: &str) -> Result<(), StoreError> {
    if transcription.trim().is_empty() {
        return Err(StoreError::EmptyTranscript);
    }
    Ok(())
}
