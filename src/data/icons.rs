//! Provider icon codes and their terminal symbols

/// OpenWeatherMap icon codes
///
/// See <https://openweathermap.org/weather-conditions>. The `d`/`n` suffix
/// marks day or night.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconCode {
    ClearDay,
    ClearNight,
    FewCloudsDay,
    FewCloudsNight,
    ScatteredClouds,
    BrokenClouds,
    ShowerRain,
    RainDay,
    RainNight,
    Thunderstorm,
    Snow,
    Mist,
    Unknown,
}

impl IconCode {
    pub fn parse(code: &str) -> Self {
        match code {
            "01d" => Self::ClearDay,
            "01n" => Self::ClearNight,
            "02d" => Self::FewCloudsDay,
            "02n" => Self::FewCloudsNight,
            "03d" | "03n" => Self::ScatteredClouds,
            "04d" | "04n" => Self::BrokenClouds,
            "09d" | "09n" => Self::ShowerRain,
            "10d" => Self::RainDay,
            "10n" => Self::RainNight,
            "11d" | "11n" => Self::Thunderstorm,
            "13d" | "13n" => Self::Snow,
            "50d" | "50n" => Self::Mist,
            _ => Self::Unknown,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::ClearDay => "\u{2600}",          // ☀
            Self::ClearNight => "\u{1F319}",       // 🌙
            Self::FewCloudsDay => "\u{26C5}",      // ⛅
            Self::FewCloudsNight => "\u{2601}",    // ☁
            Self::ScatteredClouds => "\u{2601}",   // ☁
            Self::BrokenClouds => "\u{2601}",      // ☁
            Self::ShowerRain => "\u{1F327}",       // 🌧
            Self::RainDay => "\u{1F326}",          // 🌦
            Self::RainNight => "\u{1F327}",        // 🌧
            Self::Thunderstorm => "\u{26C8}",      // ⛈
            Self::Snow => "\u{2744}",              // ❄
            Self::Mist => "\u{1F32B}",             // 🌫
            Self::Unknown => "\u{1F324}",          // 🌤
        }
    }
}

/// Symbol for a raw provider icon code
pub fn icon_symbol(code: &str) -> &'static str {
    IconCode::parse(code).symbol()
}
