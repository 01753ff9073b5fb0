// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

/// A source location, rendered by the `%L` placeholder through the location format.
///
/// Use [`location!`](crate::location) to capture the location of the call site.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Location<'a> {
    /// Module path, rendered by `%M`.
    pub module: &'a str,
    /// Source file, rendered by `%f`.
    pub file: &'a str,
    /// Function name, rendered by `%F`.
    pub function: &'a str,
    /// Line number, rendered by `%l`.
    pub line: u32,
    /// Column number, rendered by `%c`.
    pub column: u32,
}

impl<'a> Location<'a> {
    /// Create a location from its parts.
    pub const fn new(
        module: &'a str,
        file: &'a str,
        function: &'a str,
        line: u32,
        column: u32,
    ) -> Self {
        Self {
            module,
            file,
            function,
            line,
            column,
        }
    }
}

/// Name of the function enclosing a `location!` expansion.
#[doc(hidden)]
pub fn __function_name(path: &'static str) -> &'static str {
    let mut path = path.strip_suffix("::__f").unwrap_or(path);
    while let Some(outer) = path.strip_suffix("::{{closure}}") {
        path = outer;
    }
    path.rsplit("::").next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_name() {
        assert_eq!(__function_name("app::net::connect::__f"), "connect");
        assert_eq!(
            __function_name("app::net::connect::{{closure}}::{{closure}}::__f"),
            "connect"
        );
        assert_eq!(__function_name("main::__f"), "main");
    }

    #[test]
    fn test_location_macro() {
        let location = crate::location!();
        assert_eq!(location.module, module_path!());
        assert_eq!(location.file, file!());
        assert_eq!(location.function, "test_location_macro");
        assert!(location.line > 0);
    }
}
