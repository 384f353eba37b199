fn main() {
    // ort se compila con `load-dynamic`: la librería de ONNX Runtime se
    // carga en tiempo de ejecución (ORT_DYLIB_PATH), no se enlaza aquí.

    // Recompilar si cambia el directorio de ONNX Runtime
    println!("cargo:rerun-if-changed=onnxruntime-linux-x64-1.22.0/");
}
