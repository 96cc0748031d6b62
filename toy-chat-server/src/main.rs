use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use actix_cors::Cors;
use actix_web::{get, put, web, App, HttpResponse, HttpServer, Responder};
use clap::Parser;
use log::{error, info};
use serde::{Deserialize, Serialize};

use toy_chat_core::inference::entropy::{compare_entropies, EntropyAnalysis};
use toy_chat_core::inference::DEFAULT_TOP_K;
use toy_chat_core::{
	infer_next_token, ArtifactStore, InferOptions, LoadedModel, LocalStore, ModelsRegistry, PredictionResult, RawHttpStore,
};

/// Command-line configuration.
#[derive(Parser, Debug)]
#[command(name = "toy-chat-server")]
#[command(about = "Serves next-token predictions of published toy language models")]
#[command(version)]
struct Cli {
	/// Registry file listing corpora, models and prompts
	#[arg(short, long, default_value = "./data/models.json")]
	registry: PathBuf,

	#[arg(long, default_value = "127.0.0.1")]
	host: String,

	#[arg(short, long, default_value_t = 5000)]
	port: u16,

	/// Raw-content host the model repositories are fetched from
	#[arg(long, default_value = toy_chat_core::store::RAW_GITHUB_BASE)]
	raw_base_url: String,

	/// Read artifacts from `<dir>/<repo>/<branch>/...` instead of the network
	#[arg(long)]
	local_root: Option<PathBuf>,

	/// HTTP request timeout in seconds
	#[arg(long, default_value_t = 10)]
	timeout_secs: u64,
}

/// Query parameters of `/v1/predict`.
#[derive(Deserialize)]
struct PredictParams {
	prompt: Option<String>,
	top_k: Option<isize>,
	models: Option<String>, // comma separated, defaults to every loaded model
}

#[derive(Deserialize)]
struct ModelQuery {
	names: Option<String>
}

#[derive(Deserialize)]
struct PromptQuery {
	corpus: String
}

#[derive(Serialize)]
struct PredictResponse {
	predictions: Vec<PredictionResult>,
	analysis: EntropyAnalysis,
}

type SharedStore = Arc<dyn ArtifactStore + Send + Sync>;

struct SharedData {
	registry: ModelsRegistry,
	store: SharedStore,
	models: Mutex<HashMap<String, Arc<LoadedModel>>>
}

/// Splits a comma-separated list, dropping blanks.
fn split_names(names: &str) -> Vec<String> {
	names.split(',')
		.map(|s| s.trim())
		.filter(|s| !s.is_empty())
		.map(str::to_owned)
		.collect()
}

/// Registry model configurations.
#[get("/v1/models")]
async fn get_models(data: web::Data<SharedData>) -> impl Responder {
	HttpResponse::Ok().json(&data.registry.models)
}

#[get("/v1/loaded_models")]
async fn get_loaded_models(data: web::Data<SharedData>) -> impl Responder {
	let models = match data.models.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	let mut names: Vec<&String> = models.keys().collect();
	names.sort();
	HttpResponse::Ok().json(names)
}

#[get("/v1/prompts")]
async fn get_prompts(data: web::Data<SharedData>, query: web::Query<PromptQuery>) -> impl Responder {
	HttpResponse::Ok().json(data.registry.prompts_for(&query.corpus))
}

/// HTTP PUT endpoint `/v1/load_models`
///
/// Replaces the loaded set with the comma-separated registry ids in `names`.
/// Artifacts are fetched on the blocking pool; the first failing model aborts
/// the request and leaves the previous set untouched.
#[put("/v1/load_models")]
async fn put_load_models(data: web::Data<SharedData>, query: web::Query<ModelQuery>) -> impl Responder {
	let names = match &query.names {
		Some(s) if !s.trim().is_empty() => split_names(s),
		_ => return HttpResponse::BadRequest().body("Missing or empty model name"),
	};

	let mut configs = Vec::with_capacity(names.len());
	for name in &names {
		match data.registry.find_model(name) {
			Some(config) => configs.push(config.clone()),
			None => return HttpResponse::BadRequest().body(format!("Unknown model: {name}")),
		}
	}

	let store = Arc::clone(&data.store);
	let defaults = data.registry.defaults();
	let loaded = web::block(move || {
		configs
			.iter()
			.map(|config| LoadedModel::load(store.as_ref(), config, &defaults).map(|m| (config.id.clone(), Arc::new(m))))
			.collect::<Result<HashMap<_, _>, _>>()
	})
	.await;

	let loaded = match loaded {
		Ok(Ok(models)) => models,
		Ok(Err(e)) => {
			error!("Failed to load models {names:?}: {e}");
			return HttpResponse::BadGateway().body(format!("Failed to load model: {e}"));
		}
		Err(_) => return HttpResponse::InternalServerError().body("Loader task failed"),
	};

	match data.models.lock() {
		Ok(mut models) => *models = loaded,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	}

	info!("Loaded models: {}", names.join(", "));
	HttpResponse::Ok().body("Models loaded successfully")
}

/// HTTP GET endpoint `/v1/predict`
///
/// Runs the prompt through every selected loaded model and compares their
/// entropies. Models are cloned out of the lock before inference.
#[get("/v1/predict")]
async fn get_predict(data: web::Data<SharedData>, query: web::Query<PredictParams>) -> impl Responder {
	let prompt = query.prompt.as_deref().unwrap_or("");
	let options = InferOptions {
		top_k: query.top_k.unwrap_or(DEFAULT_TOP_K),
		..InferOptions::default()
	};
	let wanted = query.models.as_deref().map(split_names);

	let selected: Vec<Arc<LoadedModel>> = {
		let models = match data.models.lock() {
			Ok(m) => m,
			Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
		};
		let mut selected: Vec<Arc<LoadedModel>> = match &wanted {
			Some(ids) => ids.iter().filter_map(|id| models.get(id).cloned()).collect(),
			None => models.values().cloned().collect(),
		};
		if wanted.is_none() {
			selected.sort_by(|a, b| a.config().context_window.cmp(&b.config().context_window));
		}
		selected
	};

	if selected.is_empty() {
		return HttpResponse::BadRequest().body("No loaded model matches the request");
	}

	let predictions: Vec<PredictionResult> = selected
		.iter()
		.map(|model| infer_next_token(model, prompt, options))
		.collect();
	let analysis = compare_entropies(&predictions);

	HttpResponse::Ok().json(PredictResponse { predictions, analysis })
}

fn build_store(cli: &Cli) -> Result<SharedStore, Box<dyn std::error::Error>> {
	Ok(match &cli.local_root {
		Some(root) => Arc::new(LocalStore::new(root)),
		None => Arc::new(RawHttpStore::new(&cli.raw_base_url, Duration::from_secs(cli.timeout_secs))?),
	})
}

/// Main entry point for the server.
///
/// Reads the registry and builds the artifact store before the async runtime
/// starts (the HTTP store uses a blocking client), then serves until stopped.
/// No model is loaded at startup: clients pick them with `/v1/load_models`.
fn main() -> Result<(), Box<dyn std::error::Error>> {
	env_logger::init();
	let cli = Cli::parse();

	let registry = ModelsRegistry::load(&cli.registry)?;
	info!(
		"Registry {}: {} corpora, {} models",
		cli.registry.display(),
		registry.corpora.len(),
		registry.models.len()
	);

	let shared_data = web::Data::new(SharedData {
		registry,
		store: build_store(&cli)?,
		models: Mutex::new(HashMap::new()),
	});

	let bind = (cli.host.clone(), cli.port);
	info!("Listening on {}:{}", bind.0, bind.1);

	actix_web::rt::System::new().block_on(async move {
		HttpServer::new(move || {
			App::new()
				.wrap(Cors::permissive())
				.app_data(shared_data.clone())
				.service(get_models)
				.service(get_loaded_models)
				.service(get_prompts)
				.service(put_load_models)
				.service(get_predict)
		})
			.bind(bind)?
			.run()
			.await
	})?;

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn names_are_trimmed_and_blanks_dropped() {
		assert_eq!(split_names(" uni, ,bi ,"), ["uni", "bi"]);
		assert!(split_names(" , ").is_empty());
	}

	#[test]
	fn cli_defaults() {
		let cli = Cli::parse_from(["toy-chat-server"]);
		assert_eq!(cli.port, 5000);
		assert_eq!(cli.host, "127.0.0.1");
		assert_eq!(cli.raw_base_url, "https://raw.githubusercontent.com");
		assert!(cli.local_root.is_none());
	}
}
