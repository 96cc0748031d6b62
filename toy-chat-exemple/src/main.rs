use toy_chat_core::inference::entropy::compare_entropies;
use toy_chat_core::inference::generation::{continue_prompt, Strategy};
use toy_chat_core::{infer_next_token, InferOptions, LoadedModel, LocalStore, ModelsRegistry};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // The registry lists corpora, models and suggested prompts
    let registry = ModelsRegistry::load("./data/models.json")?;

    // Artifacts are read from a local mirror: ./data/repos/<repo>/<branch>/artifacts/...
    // Swap for `RawHttpStore::github()?` to read the published repositories instead
    let store = LocalStore::new("./data/repos");

    // Load every model; any broken artifact aborts the whole load of that model
    let mut models = Vec::new();
    for config in &registry.models {
        let model = LoadedModel::load(&store, config, &registry.defaults())?;
        println!(
            "Loaded '{}' (context window {}): {} tokens, {} states",
            model.id(),
            config.context_window,
            model.vocab().len(),
            model.weights().num_states()
        );
        models.push(model);
    }

    // Only the 3 most likely tokens are shown
    let options = InferOptions { top_k: 3, ..InferOptions::default() };

    for corpus in &registry.corpora {
        for prompt in registry.prompts_for(&corpus.id) {
            println!("\nPrompt: \"{}\"", prompt);

            let predictions: Vec<_> = models
                .iter()
                .filter(|m| m.config().corpus == corpus.id)
                .map(|m| infer_next_token(m, prompt, options))
                .collect();

            for p in &predictions {
                let top: Vec<String> = p
                    .distribution
                    .iter()
                    .map(|t| format!("{} {:.3}", t.token, t.probability))
                    .collect();
                println!(
                    "  {:<28} -> {:<8} confidence {:.3}, entropy {:.3} [{}]",
                    p.model_id,
                    p.chosen_token,
                    p.confidence,
                    p.entropy,
                    top.join(", ")
                );
            }

            println!("  {}", compare_entropies(&predictions).summary);
        }
    }

    // Let the model with the widest context continue a prompt
    if let Some(model) = models.iter().max_by_key(|m| m.config().context_window) {
        let mut rng = rand::rng();
        let greedy = continue_prompt(model, "the", 6, Strategy::Greedy, &mut rng);
        let sampled = continue_prompt(model, "the", 6, Strategy::Sample, &mut rng);
        println!("\n{} (greedy):  the {}", model.id(), greedy.join(" "));
        println!("{} (sampled): the {}", model.id(), sampled.join(" "));
    }

    Ok(())
}
