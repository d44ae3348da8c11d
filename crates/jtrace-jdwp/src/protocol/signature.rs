/// Converts a JNI type signature (e.g., `Lcom/example/Foo;` or `[I`) into
/// the Java name of the type (e.g., `com.example.Foo` or `int[]`).
///
/// Unrecognized signatures are returned unchanged.
pub fn signature_to_name(signature: &str) -> String {
    let dims = signature.bytes().take_while(|&b| b == b'[').count();
    let element = &signature[dims..];

    let mut name = match element {
        "Z" => "boolean".to_owned(),
        "B" => "byte".to_owned(),
        "C" => "char".to_owned(),
        "S" => "short".to_owned(),
        "I" => "int".to_owned(),
        "J" => "long".to_owned(),
        "F" => "float".to_owned(),
        "D" => "double".to_owned(),
        "V" => "void".to_owned(),
        _ => match element
            .strip_prefix('L')
            .and_then(|class| class.strip_suffix(';'))
        {
            Some(class) => class.replace('/', "."),
            None => return signature.to_owned(),
        },
    };

    (0..dims).for_each(|_| name.push_str("[]"));
    name
}
