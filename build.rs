use chrono::Utc;

fn main() {
    // Build timestamp reported by /api/health / 健康检查中显示的构建时间
    let stamp = Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
    println!("cargo:rustc-env=BUILD_TIME={}", stamp);
    println!("cargo:rerun-if-changed=build.rs");
}
