use dotenv::dotenv;
use parlance::responses::{CreateRequest, OutputItem, ToolDefinition};
use parlance::{OpenAiConfig, ResponsesClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let client = ResponsesClient::new(OpenAiConfig::from_env()?)?;

    // The interpreter runs on the service side; its invocations come back
    // as ordinary output items alongside the message.
    let request = CreateRequest::new(
        client.model(),
        "Use Python to compute the 40th Fibonacci number.",
    )
    .with_tools(vec![ToolDefinition::code_interpreter()]);

    let response = client.create(request).await?;

    for item in &response.output {
        if let OutputItem::CodeInterpreterCall(call) = item {
            if let Some(code) = &call.code {
                println!("--- executed code ---\n{code}\n---------------------");
            }
        }
    }
    println!("Assistant: {}", response.output_text());

    Ok(())
}
