// Diagnose NASA POWER API issues and test the parameter-name variants
use chrono::{Duration, Utc};
use reqwest::Client;
use serde_json::Value;
use skycast::constants::endpoints::{
    NOMINATIM_BASE_URL, NOMINATIM_SEARCH_PATH, POWER_BASE_URL, POWER_DAILY_POINT_PATH,
    POWER_PARAMETER_VARIANTS,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🔧 NASA POWER API Diagnostics");
    println!("=============================");

    let client = Client::builder()
        .user_agent(skycast::constants::env_config::user_agent())
        .build()?;

    let lat = -1.2921; // Nairobi
    let lon = 36.8219;

    println!("\n📍 Test Location: Nairobi, Kenya ({}, {})", lat, lon);

    let end = Utc::now().date_naive();
    let start = end - Duration::days(30);

    // Test 1: walk the parameter variants the service retries across
    println!("\n🌤️  Test 1: Daily Point Data Parameter Variants");
    println!("===============================================");

    let mut working_variant = None;

    for (index, parameters) in POWER_PARAMETER_VARIANTS.iter().enumerate() {
        println!("\n🔁 Variant {}: {}", index + 1, parameters);

        let url = format!(
            "{}{}?parameters={}&start={}&end={}&latitude={}&longitude={}&community=AG&format=JSON",
            POWER_BASE_URL,
            POWER_DAILY_POINT_PATH,
            parameters,
            start.format("%Y%m%d"),
            end.format("%Y%m%d"),
            lat,
            lon
        );

        match client.get(&url).send().await {
            Ok(response) => {
                println!("📊 Status: {}", response.status());

                if response.status().is_success() {
                    match response.json::<Value>().await {
                        Ok(data) => {
                            let parameter_names: Vec<String> = data
                                .pointer("/properties/parameter")
                                .and_then(|p| p.as_object())
                                .map(|o| o.keys().cloned().collect())
                                .unwrap_or_default();
                            let day_count = data
                                .pointer("/properties/parameter/T2M")
                                .and_then(|t| t.as_object())
                                .map(|o| o.len())
                                .unwrap_or(0);

                            println!("✅ Parsed OK");
                            println!("   📋 Parameters: {}", parameter_names.join(", "));
                            println!("   📅 T2M days: {}", day_count);

                            if day_count > 0 && working_variant.is_none() {
                                working_variant = Some(*parameters);
                            }
                        }
                        Err(e) => println!("❌ JSON Parse Error: {}", e),
                    }
                } else {
                    let error_text = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unknown".to_string());
                    println!("❌ API Error: {}", error_text);
                }
            }
            Err(e) => println!("❌ Network Error: {}", e),
        }
    }

    // Test 2: geocoder reachability
    println!("\n🗺️  Test 2: Nominatim Geocoder");
    println!("==============================");

    let geocode_url = format!(
        "{}{}?q=Nairobi%2C%20Kenya&format=json&limit=1",
        NOMINATIM_BASE_URL, NOMINATIM_SEARCH_PATH
    );

    match client.get(&geocode_url).send().await {
        Ok(response) => {
            println!("📊 Status: {}", response.status());
            if response.status().is_success() {
                match response.json::<Vec<Value>>().await {
                    Ok(places) => match places.first() {
                        Some(place) => println!(
                            "✅ Geocoded to: {}",
                            place["display_name"].as_str().unwrap_or("unknown")
                        ),
                        None => println!("❌ Empty result set"),
                    },
                    Err(e) => println!("❌ JSON Parse Error: {}", e),
                }
            }
        }
        Err(e) => println!("❌ Network Error: {}", e),
    }

    println!("\n📋 Summary");
    println!("==========");

    match working_variant {
        Some(parameters) => {
            println!("✅ POWER daily point data is available");
            println!("   First working variant: {}", parameters);
        }
        None => {
            println!("❌ No parameter variant returned data");
            println!("   💡 The service will fall back to synthetic climate data");
            println!("   💡 Forecast endpoints stay functional either way");
        }
    }

    Ok(())
}
