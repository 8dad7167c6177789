use std::fs;
use std::path::Path;

use x509_parser::pem::parse_x509_pem;

/// DER payload of the PEM certificate stored at `path`.
#[allow(dead_code)]
pub fn read_certificate_der(path: &Path) -> Vec<u8> {
    let body = fs::read(path).expect("certificate file should be readable");
    let (_, pem) = parse_x509_pem(&body).expect("certificate file should hold PEM");
    assert_eq!(pem.label, "CERTIFICATE");
    pem.contents
}

pub fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[allow(dead_code)]
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("directory should be readable")
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
