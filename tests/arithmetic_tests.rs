// Arithmetic, comparison and pointer arithmetic tests

use cwalk::interpreter::config::InterpreterConfig;
use cwalk::memory::value::Value;
use pretty_assertions::assert_eq;

/// Run `source` and return what it printed
fn printed(source: &str) -> String {
    let mut output = Vec::new();
    cwalk::run_source(source, std::io::empty(), &mut output, InterpreterConfig::default())
        .expect("Program failed");
    String::from_utf8(output).expect("Output is not UTF-8")
}

/// Evaluate a single integer expression inside `main`
fn eval(expr: &str) -> i64 {
    let source = format!("int main() {{ return {}; }}", expr);
    match cwalk::run_source(&source, std::io::empty(), Vec::new(), InterpreterConfig::default()) {
        Ok(Value::Integer(n)) => n,
        other => panic!("Expected integer from {:?}, got {:?}", expr, other),
    }
}

#[test]
fn test_basic_operators() {
    assert_eq!(eval("7 + 3"), 10);
    assert_eq!(eval("7 - 10"), -3);
    assert_eq!(eval("6 * 7"), 42);
    assert_eq!(eval("17 / 5"), 3);
    assert_eq!(eval("17 % 5"), 2);
}

#[test]
fn test_division_truncates_toward_zero() {
    assert_eq!(eval("-7 / 2"), -3);
    assert_eq!(eval("-7 % 2"), -1);
    assert_eq!(eval("7 / -2"), -3);
}

#[test]
fn test_precedence_and_parentheses() {
    assert_eq!(eval("2 + 3 * 4"), 14);
    assert_eq!(eval("(2 + 3) * 4"), 20);
    assert_eq!(eval("10 - 4 - 3"), 3);
    assert_eq!(eval("1 + 2 == 3"), 1);
    assert_eq!(eval("1 << 2 + 1"), 8);
    assert_eq!(eval("6 & 3 | 8"), 10);
}

#[test]
fn test_comparisons_yield_zero_or_one() {
    assert_eq!(eval("3 < 4"), 1);
    assert_eq!(eval("3 > 4"), 0);
    assert_eq!(eval("4 <= 4"), 1);
    assert_eq!(eval("5 >= 6"), 0);
    assert_eq!(eval("2 == 2"), 1);
    assert_eq!(eval("2 != 2"), 0);
}

#[test]
fn test_logical_and_unary_operators() {
    assert_eq!(eval("!0"), 1);
    assert_eq!(eval("!5"), 0);
    assert_eq!(eval("-(3 - 8)"), 5);
    assert_eq!(eval("~0"), -1);
    assert_eq!(eval("2 && 3"), 1);
    assert_eq!(eval("0 || 0"), 0);
    assert_eq!(eval("0 || -1"), 1);
}

#[test]
fn test_bitwise_and_shifts() {
    assert_eq!(eval("12 & 10"), 8);
    assert_eq!(eval("12 | 3"), 15);
    assert_eq!(eval("12 ^ 10"), 6);
    assert_eq!(eval("1 << 10"), 1024);
    assert_eq!(eval("-16 >> 2"), -4);
}

#[test]
fn test_logical_operators_evaluate_both_sides() {
    let source = r#"
        int count;

        int bump() {
            count = count + 1;
            return 0;
        }

        int main() {
            count = 0;
            if (0 && bump()) {
                PRINT(100);
            }
            PRINT(count);
            if (1 || bump()) {
                PRINT(count);
            }
            return 0;
        }
    "#;

    assert_eq!(printed(source), "1\n2\n");
}

#[test]
fn test_compound_assignment() {
    let source = r#"
        int main() {
            int x = 5;
            x += 3;
            PRINT(x);
            x *= 2;
            PRINT(x);
            x -= 1;
            PRINT(x);
            x /= 3;
            PRINT(x);
            x %= 4;
            PRINT(x);
            return 0;
        }
    "#;

    assert_eq!(printed(source), "8\n16\n15\n5\n1\n");
}

#[test]
fn test_increment_and_decrement() {
    let source = r#"
        int main() {
            int x = 1;
            int y = x++;
            PRINT(y);
            PRINT(x);
            PRINT(++x);
            PRINT(x--);
            PRINT(x);
            PRINT(--x);
            return 0;
        }
    "#;

    assert_eq!(printed(source), "1\n2\n3\n3\n2\n1\n");
}

#[test]
fn test_chained_assignment() {
    let source = r#"
        int main() {
            int a;
            int b;
            a = b = 7;
            PRINT(a + b);
            return 0;
        }
    "#;

    assert_eq!(printed(source), "14\n");
}

#[test]
fn test_char_values_truncate() {
    let source = r#"
        int main() {
            char c = 300;
            char d = 'A';
            PRINT(c);
            PRINT(d + 1);
            PRINT((char)255);
            return 0;
        }
    "#;

    assert_eq!(printed(source), "44\n66\n-1\n");
}

#[test]
fn test_sizeof() {
    assert_eq!(eval("sizeof(int)"), 4);
    assert_eq!(eval("sizeof(char)"), 1);
    assert_eq!(eval("sizeof(int *)"), 8);
    assert_eq!(eval("sizeof(char *)"), 8);
}

#[test]
fn test_array_sum_through_pointer() {
    let source = r#"
        int sum(int *values, int n) {
            int total = 0;
            int *end = values + n;
            while (values < end) {
                total += *values;
                values++;
            }
            return total;
        }

        int main() {
            int data[5];
            int i;
            for (i = 0; i < 5; i++) {
                data[i] = (i + 1) * 10;
            }
            PRINT(sum(data, 5));
            return 0;
        }
    "#;

    assert_eq!(printed(source), "150\n");
}

#[test]
fn test_char_buffer_indexing() {
    let source = r#"
        int main() {
            char *s = (char *)MALLOC(4);
            int i;
            for (i = 0; i < 3; i++) {
                s[i] = 'a' + i;
            }
            s[3] = 0;
            PRINT(s[2]);
            PRINT((s + 3) - s);
            FREE(s);
            return 0;
        }
    "#;

    assert_eq!(printed(source), "99\n3\n");
}

#[test]
fn test_pointer_comparisons() {
    let source = r#"
        int main() {
            int *p = (int *)MALLOC(sizeof(int) * 3);
            int *q = p + 2;
            PRINT(p < q);
            PRINT(q - 2 == p);
            PRINT(p != q);
            PRINT(!p);
            PRINT(p == 0);
            return 0;
        }
    "#;

    assert_eq!(printed(source), "1\n1\n1\n0\n0\n");
}

#[test]
fn test_integer_plus_pointer() {
    let source = r#"
        int main() {
            int *p = (int *)MALLOC(sizeof(int) * 3);
            p[2] = 9;
            PRINT(*(2 + p));
            return 0;
        }
    "#;

    assert_eq!(printed(source), "9\n");
}
