/*!
 * Tests for the chunked translator: chunking, retry and fallback
 */

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use pdfswahili::errors::{ProviderError, TranslationError};
use pdfswahili::providers::mock::MockProvider;
use pdfswahili::translation::{split_into_chunks, ChunkedTranslator, TranslationOptions};
use crate::common;

fn options(max_chunk_size: usize, max_retries: u32) -> TranslationOptions {
    TranslationOptions {
        max_chunk_size,
        max_retries,
        retry_delay: Duration::ZERO,
        fail_fast: false,
    }
}

fn translator(provider: &MockProvider, options: TranslationOptions) -> ChunkedTranslator {
    ChunkedTranslator::new(Arc::new(provider.clone()), options)
}

#[test]
fn test_splitIntoChunks_withTaggedText_shouldGiveFiveEqualChunks() {
    let text = common::chunk_tagged_text(5, 100);
    assert_eq!(text.chars().count(), 4999);

    let chunks = split_into_chunks(&text, 1000);
    assert_eq!(chunks.len(), 5);
    for (index, chunk) in chunks.iter().enumerate() {
        assert!(chunk.chars().count() <= 1000);
        assert!(chunk.split(' ').all(|word| word.starts_with(&format!("c{}", index))));
    }
}

#[test]
fn test_translate_withShortText_shouldSendOneChunkVerbatim() {
    common::init_test_logging();
    let provider = MockProvider::working();
    let translator = translator(&provider, options(4500, 3));

    let output = tokio_test::block_on(translator.translate("  Hello world.\n", "en", "sw")).unwrap();

    assert_eq!(provider.requests(), vec!["  Hello world.\n".to_string()]);
    assert_eq!(output, "[sw]   Hello world.\n");
}

#[test]
fn test_translate_withFailingThirdChunk_shouldKeepItVerbatim() {
    common::init_test_logging();
    let text = common::chunk_tagged_text(5, 100);
    let source_chunks = split_into_chunks(&text, 1000);
    let provider = MockProvider::working().with_fail_when(|chunk| chunk.starts_with("c2"));
    let translator = translator(&provider, options(1000, 2));

    let report = tokio_test::block_on(
        translator.translate_with_report(&text, "en", "sw", |_, _| {}),
    )
    .unwrap();

    assert_eq!(report.chunks.len(), 5);
    assert_eq!(report.failed_indices(), vec![2]);
    assert_eq!(report.chunks[2].text, source_chunks[2]);
    assert_eq!(report.chunks[2].attempts, 3);
    for index in [0, 1, 3, 4] {
        assert_eq!(report.chunks[index].text, format!("[sw] {}", source_chunks[index]));
        assert_eq!(report.chunks[index].attempts, 1);
    }

    // 4 good chunks + 3 attempts on the failing one
    assert_eq!(provider.request_count(), 7);

    let output = report.text();
    let expected = format!(
        "[sw] {} [sw] {} {} [sw] {} [sw] {}",
        source_chunks[0], source_chunks[1], source_chunks[2], source_chunks[3], source_chunks[4]
    );
    assert_eq!(output, expected);
}

#[test]
fn test_translate_whenEveryAttemptFails_shouldReturnOriginalText() {
    let provider = MockProvider::failing();
    let translator = translator(&provider, options(100, 3));

    let output = tokio_test::block_on(translator.translate("Hello world", "en", "sw")).unwrap();

    assert_eq!(output, "Hello world");
    assert_eq!(provider.request_count(), 4);
}

#[test]
fn test_translate_withTransientThenSuccess_shouldRetry() {
    let provider = MockProvider::fail_first(2);
    let translator = translator(&provider, options(100, 3));

    let report = tokio_test::block_on(
        translator.translate_with_report("Hello", "en", "sw", |_, _| {}),
    )
    .unwrap();

    assert_eq!(report.text(), "[sw] Hello");
    assert_eq!(report.chunks[0].attempts, 3);
    assert!(report.failed_indices().is_empty());
}

#[test]
fn test_translate_withZeroRetries_shouldMakeSingleAttempt() {
    let provider = MockProvider::fail_first(1);
    let translator = translator(&provider, options(100, 0));

    let output = tokio_test::block_on(translator.translate("Hello", "en", "sw")).unwrap();

    assert_eq!(output, "Hello");
    assert_eq!(provider.request_count(), 1);
}

#[test]
fn test_translate_withNonTransientError_shouldAbortWithoutRetry() {
    let provider = MockProvider::rejecting();
    let translator = translator(&provider, options(100, 3));

    let result = tokio_test::block_on(translator.translate("Hello", "en", "sw"));

    assert!(matches!(
        result,
        Err(TranslationError::Provider(ProviderError::AuthenticationError(_)))
    ));
    assert_eq!(provider.request_count(), 1);
}

#[test]
fn test_translate_withInvalidLanguage_shouldFailBeforeAnyCall() {
    let provider = MockProvider::working();
    let translator = translator(&provider, options(100, 3));

    let bad_target = tokio_test::block_on(translator.translate("Hello", "en", "zz"));
    let bad_source = tokio_test::block_on(translator.translate("Hello", "xx", "sw"));

    assert!(matches!(bad_target, Err(TranslationError::InvalidLanguage(_))));
    assert!(matches!(bad_source, Err(TranslationError::InvalidLanguage(_))));
    assert_eq!(provider.request_count(), 0);
}

#[test]
fn test_translate_withAutoSource_shouldBeAccepted() {
    let provider = MockProvider::working();
    let translator = translator(&provider, options(100, 0));

    let output = tokio_test::block_on(translator.translate("Hello", "auto", "sw")).unwrap();
    assert_eq!(output, "[sw] Hello");
}

#[test]
fn test_translate_withEmptyText_shouldReturnItUnchanged() {
    let provider = MockProvider::working();
    let translator = translator(&provider, options(100, 3));

    assert_eq!(tokio_test::block_on(translator.translate("", "en", "sw")).unwrap(), "");
    assert_eq!(tokio_test::block_on(translator.translate(" \n\t", "en", "zz")).unwrap(), " \n\t");
    assert_eq!(provider.request_count(), 0);
}

#[test]
fn test_translate_withFailFast_shouldReportFailingChunk() {
    let provider = MockProvider::working().with_fail_when(|chunk| chunk.starts_with("bbb"));
    let translator = translator(
        &provider,
        TranslationOptions {
            fail_fast: true,
            ..options(4, 1)
        },
    );

    let result = tokio_test::block_on(translator.translate("aaa bbb ccc", "en", "sw"));

    match result {
        Err(TranslationError::ChunkFailed { index, source }) => {
            assert_eq!(index, 1);
            assert!(source.is_transient());
        }
        other => panic!("expected ChunkFailed, got {:?}", other),
    }
    // chunk 0 once, chunk 1 twice, chunk 2 never
    assert_eq!(provider.request_count(), 3);
}

#[test]
fn test_translateWithProgress_shouldReportEveryChunk() {
    let provider = MockProvider::working().with_fail_when(|chunk| chunk == "bbb");
    let translator = translator(&provider, options(4, 0));
    let calls = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&calls);

    tokio_test::block_on(translator.translate_with_progress("aaa bbb ccc", "en", "sw", move |done, total| {
        recorded.lock().unwrap().push((done, total));
    }))
    .unwrap();

    assert_eq!(*calls.lock().unwrap(), vec![(1, 3), (2, 3), (3, 3)]);
}

#[test]
fn test_translate_shouldPreserveChunkOrder() {
    let provider = MockProvider::working().with_custom_response(|text, _| text.to_uppercase());
    let translator = translator(&provider, options(3, 0));

    let output = tokio_test::block_on(translator.translate("ab cd ef gh", "en", "sw")).unwrap();

    assert_eq!(output, "AB CD EF GH");
    assert_eq!(provider.requests(), vec!["ab", "cd", "ef", "gh"]);
}

#[tokio::test]
async fn test_translate_shouldWaitBetweenAttemptsOnly() {
    let provider = MockProvider::failing();
    let translator = translator(
        &provider,
        TranslationOptions {
            retry_delay: Duration::from_millis(30),
            ..options(100, 2)
        },
    );

    let start = Instant::now();
    translator.translate("Hello", "en", "sw").await.unwrap();
    let elapsed = start.elapsed();

    // two waits for three attempts
    assert!(elapsed >= Duration::from_millis(60), "elapsed {:?}", elapsed);
    assert!(elapsed < Duration::from_millis(2000), "elapsed {:?}", elapsed);
}

#[test]
fn test_translate_withSlowProvider_shouldStillComplete() {
    let counter = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&counter);
    let provider = MockProvider::slow(5);
    let translator = translator(&provider, options(3, 0));

    let output = tokio_test::block_on(translator.translate_with_progress("ab cd", "en", "sw", move |_, _| {
        seen.fetch_add(1, Ordering::SeqCst);
    }))
    .unwrap();

    assert_eq!(output, "[sw] ab [sw] cd");
    assert_eq!(counter.load(Ordering::SeqCst), 2);
}
