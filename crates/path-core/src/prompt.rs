//! Instruction template sent to the text generator.

const TEMPLATE: &str = r#"Actúas como diseñadora de experiencias de aprendizaje. Construye una ruta de aprendizaje en JSON, profunda y jerárquica, con recursos variados y de la mejor calidad.

Objetivo: '{goal}'
Nivel: '{level}'

REGLAS:
1. ESTRUCTURA DE ÁRBOL: genera un 'nodo_raiz' que se divida en 2 a 4 'sub_nodos' (ramas principales). Cada rama es una categoría con 'es_hub': true y contiene a su vez 'sub_nodos' anidados.
2. RECURSOS: cada paso de aprendizaje (nodo que no es hub) lleva un objeto 'recursos'. `recurso_principal` y `desafio_practico` son obligatorios; los demás solo si aportan mucho.
   - `recurso_principal`: objeto con el "titulo" del mejor artículo, video o documentación sobre la teoría.
   - `libro_recomendado`: "Título del libro y su autor".
   - `curso_profundizacion`: "Nombre del curso en Coursera, edX u otra plataforma".
   - `desafio_practico`: un ejercicio claro y accionable.
3. Tu única salida debe ser el bloque de código JSON.

FORMATO:
```json
{
  "nodo_raiz": {
    "titulo": "Ruta para: {goal} ({level})",
    "es_hub": true,
    "sub_nodos": [
      {
        "titulo": "TEMA PRINCIPAL",
        "es_hub": true,
        "sub_nodos": [
          {
            "titulo": "Concepto específico",
            "descripcion": "Descripción clara y útil del concepto.",
            "recursos": {
              "recurso_principal": { "titulo": "Tutorial en video sobre el concepto" },
              "libro_recomendado": "Título del libro de un autor reconocido",
              "desafio_practico": "Un ejercicio concreto para aplicar el concepto."
            }
          }
        ]
      }
    ]
  }
}
```
"#;

/// Builds generator prompts from the user's goal and level.
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build(&self, goal: &str, level: &str) -> String {
        TEMPLATE
            .replace("{goal}", goal.trim())
            .replace("{level}", level.trim())
    }
}
