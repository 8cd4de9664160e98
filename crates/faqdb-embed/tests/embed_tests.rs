use faqdb_core::traits::Embedder;
use faqdb_embed::{default_capabilities, FakeEmbedder, FAKE_DIM};

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[tokio::test]
async fn fake_embedder_shapes_and_determinism() {
    let embedder = FakeEmbedder::default();
    let v1 = embedder.embed("hello world").await;
    let v2 = embedder.embed("Hello,  World!").await;

    assert_eq!(v1.len(), FAKE_DIM, "embedding dim is {FAKE_DIM}");

    let norm: f32 = v1.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() <= 1e-3, "vector is L2-normalized (norm={norm})");

    // Same tokens, same vector
    for (a, b) in v1.iter().zip(v2.iter()) {
        assert!((a - b).abs() <= 1e-6);
    }
}

#[tokio::test]
async fn fake_embedder_shared_tokens_are_closer() {
    let embedder = FakeEmbedder::new(512);
    let hostel = embedder.embed("hostel food menu").await;
    let mess = embedder.embed("hostel food").await;
    let water = embedder.embed("drinking water").await;
    assert!(cosine(&hostel, &mess) > cosine(&hostel, &water));
}

#[tokio::test]
async fn fake_embedder_blank_text_has_no_embedding() {
    assert!(FakeEmbedder::default().embed(" ?! ").await.is_empty());
}

#[test]
fn fake_capabilities_from_env() {
    figment::Jail::expect_with(|jail| {
        jail.set_env("APP_USE_FAKE_EMBEDDINGS", "1");
        let caps = default_capabilities(Default::default());
        assert!(caps.embedder.embedder_id().starts_with("fake:"));

        let rt = tokio::runtime::Runtime::new().expect("runtime");
        assert!(!rt.block_on(caps.validator.validate_same_meaning("fees", "fees")));
        Ok(())
    });
}
