use tch::nn;

/// Two conv/pool blocks and two linear layers over a 1x224x427 gram.
pub fn cnn(vs: &nn::Path, num_classes: i64) -> nn::SequentialT {
    nn::seq_t()
        .add(nn::conv2d(&vs.sub("conv1"), 1, 32, 5, Default::default()))
        .add_fn(|x| x.max_pool2d_default(2).relu())
        .add(nn::conv2d(&vs.sub("conv2"), 32, 64, 5, Default::default()))
        .add_fn_t(|x, train| x.dropout(0.5, train).max_pool2d_default(2).relu())
        .add_fn(|x| x.flatten(1, -1))
        // 64 channels of 53x103 remain after both blocks.
        .add(nn::linear(&vs.sub("fc1"), 349_376, 128, Default::default()))
        .add_fn_t(|x, train| x.relu().dropout(0.5, train))
        .add(nn::linear(&vs.sub("fc2"), 128, num_classes, Default::default()))
        .add_fn(|x| x.log_softmax(1, tch::Kind::Float))
}
