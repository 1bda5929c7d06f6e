use super::{Extraction, FieldExtractor, LabelSource};

/// Line statistics from the broadband bridge modal.
pub fn extract_broadband<S: LabelSource + ?Sized>(source: &S) -> Extraction {
    let mut x = FieldExtractor::new(source);
    x.rate_pair(("up_rate", "down_rate"), "Line Rate");
    x.rate_pair(("up_maxrate", "down_maxrate"), "Maximum Line rate");
    x.pair(("up_power", "down_power"), "Output Power", "dBm");
    x.pair(("up_noisemargin", "down_noisemargin"), "Noise Margin", "dB");
    x.pair(("up_transferred", "down_transferred"), "Data Transferred", "MBytes");
    x.attenuation("Line Attenuation", "dB");
    x.duration("dsl_uptime", "DSL Uptime");
    x.text("dsl_mode", "DSL Mode");
    x.text("dsl_type", "DSL Type");
    x.text("dsl_status", "DSL Status");
    x.finish()
}
