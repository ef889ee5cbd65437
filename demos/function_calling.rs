use std::sync::Arc;

use async_trait::async_trait;
use dotenv::dotenv;
use parlance::responses::FunctionTool;
use parlance::{
    Conversation, LlmError, OpenAiConfig, ResponsesClient, ToolHandler, ToolSet, function_tool,
};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Deserialize, JsonSchema)]
struct WeatherParams {
    /// The city to get weather for
    city: String,
    /// Temperature unit (celsius or fahrenheit)
    unit: Option<String>,
}

struct GetWeather;

#[async_trait]
impl ToolHandler for GetWeather {
    fn definition(&self) -> FunctionTool {
        function_tool::<WeatherParams>("get_weather", "Get current weather for a city")
            .expect("weather params derive a clean schema")
    }

    async fn invoke(&self, arguments: Value) -> Result<Value, LlmError> {
        let params: WeatherParams =
            serde_json::from_value(arguments).map_err(|e| LlmError::ToolExecution {
                name: "get_weather".to_string(),
                message: e.to_string(),
            })?;

        let unit = params.unit.unwrap_or_else(|| "celsius".to_string());
        let suffix = if unit == "fahrenheit" { "F" } else { "C" };
        let degrees = match params.city.to_lowercase().as_str() {
            "london" => 15,
            "tokyo" => 22,
            "new york" => 18,
            _ => 20,
        };

        Ok(json!({
            "report": format!("Weather in {}: {}°{}", params.city, degrees, suffix)
        }))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let client = ResponsesClient::new(OpenAiConfig::from_env()?)?;
    let mut conversation = Conversation::new(&client);

    let mut tools = ToolSet::new();
    tools.register(Arc::new(GetWeather));

    let reply = conversation
        .send_with_tools("What's the weather like in Tokyo?", &tools)
        .await?;

    println!("Assistant: {}", reply.text);
    println!("Time taken: {:.2}s", reply.elapsed.as_secs_f64());

    Ok(())
}
