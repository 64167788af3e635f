macro_rules! printinfo {
    ($($tokens: tt)*) => {
        println!("cargo:warning=\r\x1b[36;1m   {}", format!($($tokens)*))
    }
}

fn main() {
    config_fortran_qpsol();
}

fn config_fortran_qpsol() {
    // The "fortran" feature binds to an externally supplied qpsol_
    // symbol.  When QPSOL_LIB_DIR is set we emit the link directives
    // here, otherwise the library must be provided through RUSTFLAGS
    // or a linker script by the build environment.
    println!("cargo:rerun-if-env-changed=QPSOL_LIB_DIR");
    println!("cargo:rerun-if-env-changed=QPSOL_LIB");

    if cfg!(not(feature = "fortran")) {
        return;
    }

    let Ok(dir) = std::env::var("QPSOL_LIB_DIR") else {
        printinfo!("Fortran: QPSOL_LIB_DIR not set, qpsol_ must be linked externally");
        return;
    };
    let lib = std::env::var("QPSOL_LIB").unwrap_or_else(|_| String::from("qpsol"));

    println!("cargo:rustc-link-search=native={}", dir);
    println!("cargo:rustc-link-lib={}", lib);
    printinfo!("Fortran: linking qpsol_ from lib{} in {}", lib, dir);
}
