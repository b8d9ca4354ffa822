use std::sync::Arc;

use path_core::{
    PathError, PathService, ResourceSlot, SearchHit, StaticGenerator, StaticResolver,
    TreeEnricher,
};

const MODEL_OUTPUT: &str = r#"Aquí está tu ruta:
```json
{
  "nodo_raiz": {
    "titulo": "Ruta para: Rust (principiante)",
    "es_hub": true,
    "sub_nodos": [
      {
        "titulo": "Fundamentos",
        "es_hub": true,
        "sub_nodos": [
          {
            "titulo": "Ownership",
            "descripcion": "Reglas de propiedad y préstamo.",
            "recursos": {
              "recurso_principal": {"titulo": "The Rust Book: Ownership"},
              "libro_recomendado": "Programming Rust",
              "curso_profundizacion": "Rust Fundamentals (Coursera)",
              "desafio_practico": "Implementa una lista enlazada."
            }
          }
        ]
      }
    ]
  }
}
```
¡Mucho éxito!"#;

fn service(
    output: &str,
    resolver: StaticResolver,
) -> (Arc<StaticGenerator>, Arc<StaticResolver>, PathService) {
    let generator = Arc::new(StaticGenerator::new(output));
    let resolver = Arc::new(resolver);
    let service = PathService::new(generator.clone(), TreeEnricher::new(resolver.clone()));
    (generator, resolver, service)
}

#[tokio::test]
async fn generates_and_enriches_a_path() {
    let (generator, resolver, service) = service(
        MODEL_OUTPUT,
        StaticResolver::new()
            .with_hit(
                "The Rust Book: Ownership",
                SearchHit::new(
                    "What is Ownership? - The Rust Programming Language",
                    "https://doc.rust-lang.org/book/ch04-01-what-is-ownership.html",
                ),
            )
            .with_hit(
                "Programming Rust libro",
                SearchHit::new("Programming Rust, 2nd Edition", "https://oreilly.com/pr"),
            ),
    );

    let outcome = service
        .generate_path("Rust", "principiante")
        .await
        .expect("outcome");

    let prompts = generator.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Objetivo: 'Rust'"));
    assert_eq!(
        resolver.queries(),
        vec![
            "The Rust Book: Ownership",
            "Programming Rust libro",
            "Rust Fundamentals (Coursera)"
        ]
    );
    assert_eq!(outcome.report.nodes_visited, 3);
    assert_eq!(outcome.report.verified, 2);
    assert_eq!(outcome.report.dropped, 1);

    let root = outcome.path.root.as_typed().expect("root");
    let leaf = root.children()[0].as_typed().unwrap().children()[0]
        .as_typed()
        .unwrap();
    let bundle = leaf.bundle().expect("bundle");
    assert_eq!(
        bundle
            .recommended_book
            .as_ref()
            .and_then(ResourceSlot::as_verified)
            .map(|reference| reference.title.as_str()),
        Some("Programming Rust")
    );
    assert!(bundle.deep_dive_course.is_none());
}

#[tokio::test]
async fn blank_input_is_rejected_before_generation() {
    let (generator, _, service) = service(MODEL_OUTPUT, StaticResolver::new());

    let err = service.generate_path("  ", "avanzado").await.unwrap_err();
    assert!(matches!(err, PathError::MissingInput));
    assert!(err.is_client_error());

    let err = service.generate_path("Rust", "").await.unwrap_err();
    assert!(matches!(err, PathError::MissingInput));
    assert!(generator.prompts().is_empty());
}

#[tokio::test]
async fn unusable_output_never_reaches_the_resolver() {
    let (_, resolver, service) = service(
        "Lo siento, no puedo ayudarte con eso.",
        StaticResolver::new(),
    );

    let err = service.generate_path("Rust", "medio").await.unwrap_err();
    assert!(matches!(err, PathError::UnexpectedStructure(_)));
    assert!(!err.is_client_error());
    assert!(resolver.queries().is_empty());
}

#[tokio::test]
async fn document_without_root_is_rejected() {
    let (_, resolver, service) = service("{\"ruta\": {}}", StaticResolver::new());

    let err = service.generate_path("Rust", "medio").await.unwrap_err();
    assert!(err.to_string().contains("nodo_raiz"));
    assert!(resolver.queries().is_empty());
}

#[tokio::test]
async fn generator_failures_propagate() {
    let (_, _, service) = service("", StaticResolver::new());

    let err = service.generate_path("Rust", "medio").await.unwrap_err();
    assert!(matches!(err, PathError::Generation(_)));
}

#[tokio::test]
async fn draft_skips_enrichment() {
    let (_, resolver, service) = service(MODEL_OUTPUT, StaticResolver::new());

    let path = service.draft_path("Rust", "medio").await.expect("draft");
    assert_eq!(path.node_count(), 3);
    assert!(resolver.queries().is_empty());
}
