fn main() {
    // Credentials are baked in with option_env! (adapters::wifi, adapters::mqtt); rebuild when they change.
    for var in [
        "THERMOWATCH_WIFI_SSID",
        "THERMOWATCH_WIFI_PASSWORD",
        "THERMOWATCH_MQTT_URL",
        "THERMOWATCH_MQTT_USERNAME",
        "THERMOWATCH_MQTT_PASSWORD",
    ] {
        println!("cargo:rerun-if-env-changed={var}");
    }

    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
