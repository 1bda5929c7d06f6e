use super::{Extraction, FieldExtractor, LabelSource};

/// Device identity and uptime from the gateway modal.
pub fn extract_gateway<S: LabelSource + ?Sized>(source: &S) -> Extraction {
    let mut x = FieldExtractor::new(source);
    for (field, label) in [
        ("product_vendor", "Product Vendor"),
        ("product_name", "Product Name"),
        ("software_version", "Software Version"),
        ("firmware_version", "Firmware Version"),
        ("hardware_version", "Hardware Version"),
        ("serial_number", "Serial Number"),
        ("mac_address", "MAC Address"),
    ] {
        x.text(field, label);
    }
    x.duration("uptime", "Uptime");
    x.finish()
}
