//! Text-to-audio synthesis pipeline.
//!
//! Strictly sequential: annotate the text, split it into sentences, run
//! each sentence through the model runtime, join the segments with a
//! quarter second of silence, write one WAV artifact, and render the
//! audio embed markup the host displays in place of the message.

mod engine;
mod segment;

pub use engine::{
    MIN_EOS_P, SENTENCE_GAP_SECS, SynthesisError, SynthesisOutput, SynthesisPipeline, annotate,
};
pub use segment::{RuleSplitter, SentenceSplitter};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SpeakerTag, TtsSettings};
    use crate::model::{MockBarkModel, ModelError};
    use tempfile::TempDir;

    fn two_sentence_model(segment_len: usize) -> MockBarkModel {
        let mut mock = MockBarkModel::new();
        mock.expect_generate_semantic()
            .times(2)
            .returning(|_, _, _, _| Ok(vec![5, 6, 7]));
        mock.expect_semantic_to_waveform()
            .times(2)
            .returning(move |_, _| Ok(vec![0.25; segment_len]));
        mock
    }

    // ===========================================
    // Annotation
    // ===========================================

    #[test]
    fn test_annotate_prefixes_modifiers() {
        let mut settings = TtsSettings::default();
        settings.modifiers = vec!["[laughter]".to_string()];

        assert_eq!(
            annotate("the joke landed", &settings),
            "[laughter]: the joke landed"
        );
    }

    #[test]
    fn test_annotate_speaker_tag_is_outermost() {
        let mut settings = TtsSettings::default();
        settings.modifiers = vec!["[sighs]".to_string()];
        settings.forced_speaker = Some(SpeakerTag::Narrator);

        assert_eq!(
            annotate("a long day", &settings),
            "NARRATOR: [sighs]: a long day"
        );
    }

    #[test]
    fn test_annotate_joins_modifiers_with_spaces() {
        let mut settings = TtsSettings::default();
        settings.modifiers = vec!["[laughter]".to_string(), "[gasps]".to_string()];

        assert_eq!(annotate("oh no", &settings), "[laughter] [gasps]: oh no");
    }

    #[test]
    fn test_annotate_without_tags_leaves_text_untouched() {
        let settings = TtsSettings::default();
        assert_eq!(annotate("plain text", &settings), "plain text");
    }

    // ===========================================
    // Synthesis
    // ===========================================

    #[test]
    fn test_synthesize_writes_artifact_at_config_sample_rate() {
        let temp_dir = TempDir::new().unwrap();
        let pipeline =
            SynthesisPipeline::new(two_sentence_model(100), temp_dir.path().to_path_buf());

        let output = pipeline
            .synthesize("eva", "Hello there. General Kenobi.", &TtsSettings::default())
            .unwrap();

        let reader = hound::WavReader::open(&output.path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.sample_rate, TtsSettings::default().sample_rate);
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_format, hound::SampleFormat::Float);
    }

    #[test]
    fn test_sample_count_is_segments_plus_gaps() {
        let temp_dir = TempDir::new().unwrap();
        let pipeline =
            SynthesisPipeline::new(two_sentence_model(100), temp_dir.path().to_path_buf());

        let mut settings = TtsSettings::default();
        settings.sample_rate = 1000;

        let output = pipeline
            .synthesize("eva", "One sentence. And another.", &settings)
            .unwrap();

        // Two 100-sample segments, each followed by 0.25s (250 samples) of silence.
        let reader = hound::WavReader::open(&output.path).unwrap();
        assert_eq!(reader.len(), 2 * (100 + 250));
    }

    #[test]
    fn test_voice_temperature_and_eos_floor_are_forwarded() {
        let temp_dir = TempDir::new().unwrap();
        let mut mock = MockBarkModel::new();

        mock.expect_generate_semantic()
            .withf(|text, voice, temperature, min_eos_p| {
                text == "Short."
                    && voice == "v2/en_speaker_9"
                    && *temperature == 0.9
                    && *min_eos_p == MIN_EOS_P
            })
            .times(1)
            .returning(|_, _, _, _| Ok(vec![1]));
        mock.expect_semantic_to_waveform()
            .withf(|tokens, voice| tokens == [1] && voice == "v2/en_speaker_9")
            .times(1)
            .returning(|_, _| Ok(vec![0.1; 10]));

        let mut settings = TtsSettings::default();
        settings.voice = "v2/en_speaker_9".to_string();
        settings.temperature = 0.9;

        let pipeline = SynthesisPipeline::new(mock, temp_dir.path().to_path_buf());
        pipeline.synthesize("eva", "Short.", &settings).unwrap();
    }

    #[test]
    fn test_empty_text_still_produces_one_artifact() {
        let temp_dir = TempDir::new().unwrap();
        let pipeline =
            SynthesisPipeline::new(MockBarkModel::new(), temp_dir.path().to_path_buf());

        let output = pipeline
            .synthesize("eva", "", &TtsSettings::default())
            .unwrap();

        let reader = hound::WavReader::open(&output.path).unwrap();
        assert_eq!(reader.len(), 0);
        assert_eq!(reader.spec().sample_rate, TtsSettings::default().sample_rate);
    }

    #[test]
    fn test_same_second_requests_get_distinct_artifacts() {
        let temp_dir = TempDir::new().unwrap();
        let pipeline =
            SynthesisPipeline::new(MockBarkModel::new(), temp_dir.path().to_path_buf());
        let settings = TtsSettings::default();

        let first = pipeline.synthesize("eva", "", &settings).unwrap();
        let second = pipeline.synthesize("eva", "", &settings).unwrap();

        assert_ne!(first.path, second.path);
        assert!(first.path.exists());
        assert!(second.path.exists());
    }

    #[test]
    fn test_markup_references_artifact_and_respects_flags() {
        let temp_dir = TempDir::new().unwrap();
        let pipeline =
            SynthesisPipeline::new(two_sentence_model(10), temp_dir.path().to_path_buf());

        let mut settings = TtsSettings::default();
        settings.autoplay = true;
        settings.show_text = true;
        settings.forced_speaker = Some(SpeakerTag::Man);

        let output = pipeline
            .synthesize("eva", "Hi there. Bye now.", &settings)
            .unwrap();

        assert!(output.markup.contains("<audio src=\"file/"));
        assert!(output.markup.contains("autoplay"));
        assert!(
            output
                .markup
                .ends_with("<br>MAN: Hi there. Bye now.")
        );
        assert_eq!(output.annotated_text, "MAN: Hi there. Bye now.");
    }

    #[test]
    fn test_markup_omits_text_by_default() {
        let temp_dir = TempDir::new().unwrap();
        let pipeline =
            SynthesisPipeline::new(MockBarkModel::new(), temp_dir.path().to_path_buf());

        let output = pipeline
            .synthesize("eva", "", &TtsSettings::default())
            .unwrap();

        assert!(output.markup.starts_with("<audio"));
        assert!(output.markup.ends_with("</audio>"));
        assert!(!output.markup.contains("<br>"));
    }

    #[test]
    fn test_character_label_with_path_separators_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let pipeline =
            SynthesisPipeline::new(MockBarkModel::new(), temp_dir.path().to_path_buf());

        let result = pipeline.synthesize("../evil", "", &TtsSettings::default());

        assert!(matches!(result, Err(SynthesisError::InvalidLabel(_))));
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_model_errors_propagate_without_artifact() {
        let temp_dir = TempDir::new().unwrap();
        let mut mock = MockBarkModel::new();

        mock.expect_generate_semantic()
            .times(1)
            .returning(|_, _, _, _| Err(ModelError::Inference("OOM".to_string())));

        let pipeline = SynthesisPipeline::new(mock, temp_dir.path().to_path_buf());
        let result = pipeline.synthesize("eva", "Doomed.", &TtsSettings::default());

        assert!(matches!(
            result,
            Err(SynthesisError::Model(ModelError::Inference(_)))
        ));
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }
}
